//! Analyzer capability traits.
//!
//! Each analyzer role produces exactly one IR fragment, so each role gets
//! its own trait with a distinct return type covering a disjoint subset of
//! `AppIr` fields. Assembly in `Compiler::analyze` is then a total,
//! non-overlapping merge: two analyzers writing the same slot is a type
//! error, not a silent overwrite.
//!
//! Analyzers own all source I/O and AST reading. The compiler never sees a
//! source file; it sees fragments and the analyzer's diagnostics.

use async_trait::async_trait;

use crate::diagnostic::{CompilerError, Diagnostic};
use crate::ir::{AppDefinition, DependencyGraphIr, EntityIr, EnvIr, MiddlewareIr, ModuleIr, SchemaIr};

/// Produces the environment fragment.
#[async_trait]
pub trait EnvAnalyzer: Send {
    async fn analyze(&mut self) -> Result<Option<EnvIr>, CompilerError>;

    /// Diagnostics recorded during the last `analyze` call. Returns an
    /// owned copy; callers may not reach into analyzer state.
    fn diagnostics(&self) -> Vec<Diagnostic>;
}

/// Produces the schema fragment.
#[async_trait]
pub trait SchemaAnalyzer: Send {
    async fn analyze(&mut self) -> Result<Vec<SchemaIr>, CompilerError>;

    fn diagnostics(&self) -> Vec<Diagnostic>;
}

/// Produces the middleware fragment.
#[async_trait]
pub trait MiddlewareAnalyzer: Send {
    async fn analyze(&mut self) -> Result<Vec<MiddlewareIr>, CompilerError>;

    fn diagnostics(&self) -> Vec<Diagnostic>;
}

/// Produces the module fragment (modules with their owned services and
/// routers).
#[async_trait]
pub trait ModuleAnalyzer: Send {
    async fn analyze(&mut self) -> Result<Vec<ModuleIr>, CompilerError>;

    fn diagnostics(&self) -> Vec<Diagnostic>;
}

/// Produces the application definition fragment.
#[async_trait]
pub trait AppAnalyzer: Send {
    async fn analyze(&mut self) -> Result<AppDefinition, CompilerError>;

    fn diagnostics(&self) -> Vec<Diagnostic>;
}

/// Produces the dependency graph fragment, including initialization order
/// and detected cycles.
#[async_trait]
pub trait DependencyGraphAnalyzer: Send {
    async fn analyze(&mut self) -> Result<DependencyGraphIr, CompilerError>;

    fn diagnostics(&self) -> Vec<Diagnostic>;
}

/// Produces the entity fragment.
#[async_trait]
pub trait EntityAnalyzer: Send {
    async fn analyze(&mut self) -> Result<Vec<EntityIr>, CompilerError>;

    fn diagnostics(&self) -> Vec<Diagnostic>;
}

/// The statically-typed bundle of collaborators the compiler is built with.
///
/// Six analyzers are required; the entity analyzer is optional and its
/// absence means the application declares no entities.
pub struct AnalyzerSet {
    pub env: Box<dyn EnvAnalyzer>,
    pub schema: Box<dyn SchemaAnalyzer>,
    pub middleware: Box<dyn MiddlewareAnalyzer>,
    pub module: Box<dyn ModuleAnalyzer>,
    pub app: Box<dyn AppAnalyzer>,
    pub graph: Box<dyn DependencyGraphAnalyzer>,
    pub entity: Option<Box<dyn EntityAnalyzer>>,
}
