//! Intermediate representation of a declarative application.
//!
//! This IR is produced by analyzers and consumed by validators and
//! generators. It represents the application's declared architecture
//! (modules, services, routers, middleware, schemas, entities, dependency
//! graph) independent of the source language.
//!
//! Every IR type is a plain `Clone` value. A pass produces a new `AppIr`;
//! the only sanctioned in-place mutation is the entity-route finalize step
//! applied before the value leaves `Compiler::analyze`.

mod entity;
mod graph;
mod middleware;
mod module;
mod schema;

pub mod builder;

pub use entity::{CrudOp, EntityAccess, EntityActionIr, EntityIr, EntityModelRefs};
pub use graph::{DependencyGraphIr, EdgeKind, GraphEdge, GraphNode, NodeKind};
pub use middleware::MiddlewareIr;
pub use module::{
    HttpMethod, ImportSource, InjectionRef, MethodSignature, ModuleImport, ModuleIr, RouteIr,
    RouterIr, ServiceIr,
};
pub use schema::{
    context_keys, parse_schema_name, SchemaIr, SchemaNameParts, SchemaOperation, SchemaPart,
    SchemaRef,
};

use std::path::PathBuf;

use crate::diagnostic::{Diagnostic, SourceLocation};

/// A module registration recorded in the application definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleRegistration {
    pub module: String,

    /// Whether the registration supplies an options value.
    pub has_options: bool,

    pub location: Option<SourceLocation>,
}

/// The application definition: registrations and global middleware order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppDefinition {
    pub name: String,

    pub registrations: Vec<ModuleRegistration>,

    /// Global middleware names in registration order. The order is
    /// semantic: provided context keys accumulate along it.
    pub middleware: Vec<String>,

    pub location: Option<SourceLocation>,
}

/// A declared environment variable.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvVarIr {
    pub name: String,
    pub required: bool,
    pub default: Option<String>,
}

/// IR representation of the environment definition.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvIr {
    pub file: PathBuf,
    pub variables: Vec<EnvVarIr>,
}

/// The complete application IR.
#[derive(Debug, Clone, PartialEq)]
pub struct AppIr {
    pub app: AppDefinition,
    pub env: Option<EnvIr>,
    pub modules: Vec<ModuleIr>,
    pub middlewares: Vec<MiddlewareIr>,
    pub schemas: Vec<SchemaIr>,
    pub entities: Vec<EntityIr>,
    pub dependency_graph: DependencyGraphIr,
    pub diagnostics: Vec<Diagnostic>,
}

impl AppIr {
    /// A baseline IR with every container empty.
    pub fn empty() -> Self {
        Self {
            app: AppDefinition::default(),
            env: None,
            modules: Vec::new(),
            middlewares: Vec::new(),
            schemas: Vec::new(),
            entities: Vec::new(),
            dependency_graph: DependencyGraphIr::default(),
            diagnostics: Vec::new(),
        }
    }

    /// Looks a module up by name.
    pub fn module(&self, name: &str) -> Option<&ModuleIr> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// All routes of all routers, with their owning module and router.
    pub fn routes(&self) -> impl Iterator<Item = (&ModuleIr, &RouterIr, &RouteIr)> {
        self.modules.iter().flat_map(|module| {
            module.routers.iter().flat_map(move |router| {
                router.routes.iter().map(move |route| (module, router, route))
            })
        })
    }
}
