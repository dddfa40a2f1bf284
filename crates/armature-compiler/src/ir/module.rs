//! Module, service, router, and route intermediate representation.

use super::SchemaRef;
use crate::diagnostic::SourceLocation;

/// HTTP methods a route can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    /// Parse a method from a string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "PATCH" => Some(HttpMethod::Patch),
            "DELETE" => Some(HttpMethod::Delete),
            "HEAD" => Some(HttpMethod::Head),
            "OPTIONS" => Some(HttpMethod::Options),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    /// Whether routes with this method must declare a response schema.
    pub fn requires_response(&self) -> bool {
        !matches!(
            self,
            HttpMethod::Delete | HttpMethod::Head | HttpMethod::Options
        )
    }
}

/// Where an imported binding comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportSource {
    /// An export of another module.
    Module { module: String, export: String },
    /// The environment module.
    Env,
}

/// A single import binding in a module.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleImport {
    pub alias: String,
    pub source: ImportSource,
}

impl ModuleImport {
    pub fn is_env(&self) -> bool {
        matches!(self.source, ImportSource::Env)
    }
}

/// An injected dependency: the local alias and the token it resolves to.
#[derive(Debug, Clone, PartialEq)]
pub struct InjectionRef {
    pub alias: String,
    pub token: String,
}

/// Method metadata on a service. Bodies are never represented.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSignature {
    pub name: String,
    pub parameters: Vec<String>,
    pub is_async: bool,
}

/// IR representation of a service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceIr {
    /// Name of the service, unique within its module.
    pub name: String,

    /// Name of the owning module. Must equal the containing module.
    pub module_name: String,

    /// Injected dependencies.
    pub injections: Vec<InjectionRef>,

    /// Public method signatures.
    pub methods: Vec<MethodSignature>,

    pub location: Option<SourceLocation>,
}

/// IR representation of a single route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteIr {
    pub method: HttpMethod,

    /// The path template as declared on the route (e.g. `/users/:id`).
    pub path: String,

    /// The declared path resolved against the router prefix.
    pub full_path: String,

    /// Globally unique operation identifier.
    pub operation_id: String,

    pub params: Option<SchemaRef>,
    pub query: Option<SchemaRef>,
    pub body: Option<SchemaRef>,
    pub headers: Option<SchemaRef>,
    pub response: Option<SchemaRef>,

    /// Names of middleware applied to this route.
    pub middleware: Vec<String>,

    pub tags: Vec<String>,

    pub location: Option<SourceLocation>,
}

impl RouteIr {
    /// The five schema slots of a route, in a fixed order.
    pub fn schema_slots(&self) -> [&Option<SchemaRef>; 5] {
        [
            &self.params,
            &self.query,
            &self.body,
            &self.headers,
            &self.response,
        ]
    }
}

/// IR representation of a router.
#[derive(Debug, Clone, PartialEq)]
pub struct RouterIr {
    pub name: String,

    /// Name of the owning module.
    pub module_name: String,

    /// Prefix prepended to each route path when resolving `full_path`.
    pub path_prefix: String,

    pub injections: Vec<InjectionRef>,

    pub routes: Vec<RouteIr>,

    pub location: Option<SourceLocation>,
}

/// IR representation of a module.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleIr {
    /// Name of the module. Primary key for incremental merges.
    pub name: String,

    pub imports: Vec<ModuleImport>,

    /// Schema describing the options this module accepts at registration.
    pub options_schema: Option<SchemaRef>,

    pub services: Vec<ServiceIr>,

    pub routers: Vec<RouterIr>,

    /// Names of services this module exports. Must be a subset of the
    /// local service names.
    pub exports: Vec<String>,

    pub location: Option<SourceLocation>,
}

impl ModuleIr {
    /// A bare module with the given name and no members.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            imports: Vec::new(),
            options_schema: None,
            services: Vec::new(),
            routers: Vec::new(),
            exports: Vec::new(),
            location: None,
        }
    }

    pub fn service_names(&self) -> impl Iterator<Item = &str> {
        self.services.iter().map(|s| s.name.as_str())
    }
}
