//! Entity route injection.
//!
//! Entities are expanded into CRUD and custom-action routes. All generated
//! routes land in one synthetic router under one synthetic module, appended
//! to the IR only when at least one route was produced.
//!
//! `inject_entity_routes` is the single sanctioned in-place step of the
//! pipeline: it runs last in `Compiler::analyze`, on the pass-local IR
//! value, before that value is returned.

use std::collections::{HashMap, HashSet};

use serde_json::json;

use crate::diagnostic::{Diagnostic, DiagnosticCode, SourceLocation};
use crate::ir::{
    AppIr, CrudOp, EntityAccess, EntityIr, HttpMethod, ModuleIr, RouteIr, RouterIr, SchemaRef,
};

/// Name of the synthetic module entity routes are spliced into.
pub const ENTITY_MODULE_NAME: &str = "entities";

/// Name of the synthetic router inside the synthetic module.
pub const ENTITY_ROUTER_NAME: &str = "entities";

/// Splices generated entity routes into the IR.
pub fn inject_entity_routes(ir: &mut AppIr) {
    let routes = build_entity_routes(&ir.entities);
    if routes.is_empty() {
        return;
    }

    let mut module = ModuleIr::named(ENTITY_MODULE_NAME);
    module.routers.push(RouterIr {
        name: ENTITY_ROUTER_NAME.to_string(),
        module_name: ENTITY_MODULE_NAME.to_string(),
        path_prefix: String::new(),
        injections: Vec::new(),
        routes,
        location: None,
    });
    ir.modules.push(module);
}

fn build_entity_routes(entities: &[EntityIr]) -> Vec<RouteIr> {
    let mut routes = Vec::new();
    for entity in entities {
        for op in CrudOp::ALL {
            if entity.crud_access(op) == EntityAccess::Disabled {
                continue;
            }
            routes.push(crud_route(entity, op));
        }
        for action in &entity.actions {
            if !entity.action_allowed(&action.name) {
                continue;
            }
            let path = match &action.path {
                Some(suffix) if suffix.starts_with('/') => {
                    format!("/{}{}", entity.name, suffix)
                }
                Some(suffix) => format!("/{}/{}", entity.name, suffix),
                None if action.has_id => format!("/{}/:id/{}", entity.name, action.name),
                None => format!("/{}/{}", entity.name, action.name),
            };
            routes.push(entity_route(
                entity,
                action.method,
                path,
                format!("{}{}", action.name, to_pascal_case(&entity.name)),
                action.input.clone(),
                action.output.clone(),
            ));
        }
    }
    routes
}

fn crud_route(entity: &EntityIr, op: CrudOp) -> RouteIr {
    let (method, path) = match op {
        CrudOp::List => (HttpMethod::Get, format!("/{}", entity.name)),
        CrudOp::Get => (HttpMethod::Get, format!("/{}/:id", entity.name)),
        CrudOp::Create => (HttpMethod::Post, format!("/{}", entity.name)),
        CrudOp::Update => (HttpMethod::Patch, format!("/{}/:id", entity.name)),
        CrudOp::Delete => (HttpMethod::Delete, format!("/{}/:id", entity.name)),
    };

    let model = entity.model.as_ref();
    let body = match op {
        CrudOp::Create => model.and_then(|m| m.create.clone()),
        CrudOp::Update => model.and_then(|m| m.update.clone()),
        _ => None,
    };
    let response = match op {
        CrudOp::List => model
            .and_then(|m| m.response.as_ref())
            .map(paginated_envelope),
        _ => model.and_then(|m| m.response.clone()),
    };

    entity_route(
        entity,
        method,
        path,
        format!("{}{}", op.as_str(), to_pascal_case(&entity.name)),
        body,
        response,
    )
}

fn entity_route(
    entity: &EntityIr,
    method: HttpMethod,
    path: String,
    operation_id: String,
    body: Option<SchemaRef>,
    response: Option<SchemaRef>,
) -> RouteIr {
    RouteIr {
        method,
        full_path: path.clone(),
        path,
        operation_id,
        params: None,
        query: None,
        body,
        headers: None,
        response,
        middleware: Vec::new(),
        tags: vec![entity.name.clone()],
        location: entity.location.clone(),
    }
}

/// Wraps a response ref in the paginated list envelope.
///
/// Named refs are linked via `$ref`; inline shapes are embedded.
fn paginated_envelope(response: &SchemaRef) -> SchemaRef {
    let items = match response {
        SchemaRef::Named { name, .. } => json!({
            "type": "array",
            "items": { "$ref": format!("#/components/schemas/{name}") }
        }),
        SchemaRef::Inline { shape, .. } => json!({
            "type": "array",
            "items": shape
        }),
    };

    SchemaRef::Inline {
        file: response.file().clone(),
        shape: json!({
            "type": "object",
            "properties": {
                "items": items,
                "total": { "type": "number" },
                "limit": { "type": "number" },
                "nextCursor": { "type": ["string", "null"] },
                "hasNextPage": { "type": "boolean" }
            },
            "required": ["items", "total", "hasNextPage"]
        }),
    }
}

/// Reports generated operationIds that collide with hand-written routes.
///
/// The first-location map is built from hand-written routers only; each
/// synthetic route found in it is an error naming both locations. The map
/// is updated with the synthetic route either way. Collisions among entity
/// routes themselves are not cross-checked.
pub fn detect_route_collisions(ir: &AppIr) -> Vec<Diagnostic> {
    let mut first_seen: HashMap<&str, (&str, Option<&SourceLocation>)> = HashMap::new();
    for module in ir.modules.iter().filter(|m| m.name != ENTITY_MODULE_NAME) {
        for router in &module.routers {
            for route in &router.routes {
                first_seen
                    .entry(route.operation_id.as_str())
                    .or_insert((router.name.as_str(), route.location.as_ref()));
            }
        }
    }
    let handwritten: HashSet<&str> = first_seen.keys().copied().collect();

    let mut diagnostics = Vec::new();
    if let Some(module) = ir.module(ENTITY_MODULE_NAME) {
        for router in &module.routers {
            for route in &router.routes {
                if handwritten.contains(route.operation_id.as_str()) {
                    let (router_name, declared_at) = first_seen[route.operation_id.as_str()];
                    diagnostics.push(
                        Diagnostic::error(
                            DiagnosticCode::OperationIdCollision,
                            format!(
                                "Generated operationId '{}' collides with a route declared in router '{}' at {}",
                                route.operation_id,
                                router_name,
                                declared_at
                                    .map(|l| l.to_string())
                                    .unwrap_or_else(|| "an unknown location".to_string()),
                            ),
                        )
                        .with_location(route.location.as_ref()),
                    );
                }
                first_seen.insert(
                    route.operation_id.as_str(),
                    (router.name.as_str(), route.location.as_ref()),
                );
            }
        }
    }
    diagnostics
}

/// Converts an entity name to PascalCase for operationId construction.
fn to_pascal_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = true;
    for c in name.chars() {
        if c == '-' || c == '_' || c == ' ' {
            upper_next = true;
            continue;
        }
        if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
