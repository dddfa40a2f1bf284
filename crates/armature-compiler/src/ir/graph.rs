//! Dependency graph intermediate representation.
//!
//! The graph is analyzer-supplied: nodes, edges, initialization order, and
//! detected cycles all arrive ready-made. The compiler only consumes it for
//! validation; cycles are reported, never auto-broken.

/// Kinds of nodes in the dependency graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Module,
    Service,
    Router,
    Middleware,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Module => "module",
            NodeKind::Service => "service",
            NodeKind::Router => "router",
            NodeKind::Middleware => "middleware",
        }
    }
}

/// Kinds of edges in the dependency graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Imports,
    Inject,
    UsesMiddleware,
    Exports,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Imports => "imports",
            EdgeKind::Inject => "inject",
            EdgeKind::UsesMiddleware => "uses-middleware",
            EdgeKind::Exports => "exports",
        }
    }
}

/// A node in the dependency graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    pub name: String,
    /// Owning module, for owned node kinds.
    pub owner: Option<String>,
}

/// A directed edge in the dependency graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
}

/// IR representation of the application dependency graph.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DependencyGraphIr {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,

    /// Topological module initialization sequence.
    pub initialization_order: Vec<String>,

    /// Detected cycles, each a sequence of module names.
    pub circular_dependencies: Vec<Vec<String>>,
}

impl DependencyGraphIr {
    /// True when the analyzer produced no graph content at all.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty() && self.initialization_order.is_empty()
    }
}
