//! Cross-cutting completeness validation.
//!
//! These checks read across module boundaries: response coverage, dead
//! services and schemas, DI resolution, middleware ordering contracts,
//! registration options, path parameters, route uniqueness, context-key
//! collisions, and path formatting.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use super::Validator;
use crate::diagnostic::{CompilerError, Diagnostic, DiagnosticCode, SourceLocation};
use crate::ir::{context_keys, AppIr, ModuleIr};

/// Context keys owned by the framework; middleware may not provide them.
pub const RESERVED_CONTEXT_KEYS: &[&str] = &[
    "request", "response", "params", "query", "body", "headers", "log",
];

pub struct CompletenessValidator;

#[async_trait]
impl Validator for CompletenessValidator {
    fn name(&self) -> &str {
        "completeness"
    }

    async fn validate(&self, ir: &AppIr) -> Result<Vec<Diagnostic>, CompilerError> {
        let mut diagnostics = Vec::new();
        diagnostics.extend(check_route_responses(ir));
        diagnostics.extend(check_unreferenced_services(ir));
        diagnostics.extend(check_unreferenced_schemas(ir));
        diagnostics.extend(check_injection_resolution(ir));
        diagnostics.extend(check_middleware_order(ir));
        diagnostics.extend(check_registration_options(ir));
        diagnostics.extend(check_path_params(ir));
        diagnostics.extend(check_duplicate_paths(ir));
        diagnostics.extend(check_context_keys(ir));
        diagnostics.extend(check_path_format(ir));
        Ok(diagnostics)
    }
}

/// Every injection token used anywhere in the IR.
fn all_injection_tokens(ir: &AppIr) -> HashSet<&str> {
    let mut tokens = HashSet::new();
    for module in &ir.modules {
        for service in &module.services {
            tokens.extend(service.injections.iter().map(|i| i.token.as_str()));
        }
        for router in &module.routers {
            tokens.extend(router.injections.iter().map(|i| i.token.as_str()));
        }
    }
    for middleware in &ir.middlewares {
        tokens.extend(middleware.injections.iter().map(|i| i.token.as_str()));
    }
    tokens
}

// (a) Non-{DELETE, HEAD, OPTIONS} routes must declare a response.
fn check_route_responses(ir: &AppIr) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for (_, _, route) in ir.routes() {
        if route.method.requires_response() && route.response.is_none() {
            diagnostics.push(
                Diagnostic::error(
                    DiagnosticCode::MissingResponse,
                    format!(
                        "Route '{}' ({} {}) has no response schema",
                        route.operation_id,
                        route.method.as_str(),
                        route.full_path
                    ),
                )
                .with_location(route.location.as_ref()),
            );
        }
    }
    diagnostics
}

// (b) A service nobody injects or exports is dead weight.
fn check_unreferenced_services(ir: &AppIr) -> Vec<Diagnostic> {
    let mut referenced = all_injection_tokens(ir);
    for module in &ir.modules {
        referenced.extend(module.exports.iter().map(String::as_str));
    }

    let mut diagnostics = Vec::new();
    for module in &ir.modules {
        for service in &module.services {
            if !referenced.contains(service.name.as_str()) {
                diagnostics.push(
                    Diagnostic::warning(
                        DiagnosticCode::UnreferencedService,
                        format!(
                            "Service '{}' in module '{}' is never injected or exported",
                            service.name, module.name
                        ),
                    )
                    .with_location(service.location.as_ref()),
                );
            }
        }
    }
    diagnostics
}

// (c) A named schema no route slot or middleware contract points at.
fn check_unreferenced_schemas(ir: &AppIr) -> Vec<Diagnostic> {
    let mut referenced: HashSet<&str> = HashSet::new();
    for (_, _, route) in ir.routes() {
        for slot in route.schema_slots() {
            if let Some(name) = slot.as_ref().and_then(|r| r.name()) {
                referenced.insert(name);
            }
        }
    }
    for middleware in &ir.middlewares {
        for slot in [&middleware.requires, &middleware.provides] {
            if let Some(name) = slot.as_ref().and_then(|r| r.name()) {
                referenced.insert(name);
            }
        }
    }

    let mut diagnostics = Vec::new();
    for schema in ir.schemas.iter().filter(|s| s.is_named) {
        if !referenced.contains(schema.name.as_str()) {
            diagnostics.push(
                Diagnostic::warning(
                    DiagnosticCode::UnreferencedSchema,
                    format!(
                        "Schema '{}' is not referenced by any route or middleware",
                        schema.name
                    ),
                )
                .with_location(schema.location.as_ref()),
            );
        }
    }
    diagnostics
}

/// Tokens resolvable inside a module: its own services plus the exports of
/// every non-env module it imports.
fn available_tokens<'a>(ir: &'a AppIr, module: &'a ModuleIr) -> HashSet<&'a str> {
    let mut available: HashSet<&str> = module.service_names().collect();
    for import in module.imports.iter().filter(|i| !i.is_env()) {
        if let crate::ir::ImportSource::Module { module: source, .. } = &import.source {
            if let Some(imported) = ir.module(source) {
                available.extend(imported.exports.iter().map(String::as_str));
            }
        }
    }
    available
}

// (d) Every injection must resolve against the module's available tokens.
fn check_injection_resolution(ir: &AppIr) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for module in &ir.modules {
        let available = available_tokens(ir, module);
        let mut report = |kind: &str,
                          requester: &str,
                          token: &str,
                          location: Option<&SourceLocation>| {
            diagnostics.push(
                Diagnostic::error(
                    DiagnosticCode::UnresolvedInjection,
                    format!(
                        "{kind} '{requester}' injects '{token}' which is not available in module '{}'",
                        module.name
                    ),
                )
                .with_location(location),
            );
        };

        for service in &module.services {
            for injection in &service.injections {
                if !available.contains(injection.token.as_str()) {
                    report(
                        "Service",
                        &service.name,
                        &injection.token,
                        service.location.as_ref(),
                    );
                }
            }
        }
        for router in &module.routers {
            for injection in &router.injections {
                if !available.contains(injection.token.as_str()) {
                    report(
                        "Router",
                        &router.name,
                        &injection.token,
                        router.location.as_ref(),
                    );
                }
            }
        }
    }
    diagnostics
}

// (e) Walk global middleware in registration order; requires must be
// satisfied by keys provided earlier.
fn check_middleware_order(ir: &AppIr) -> Vec<Diagnostic> {
    let by_name: HashMap<&str, &crate::ir::MiddlewareIr> = ir
        .middlewares
        .iter()
        .map(|m| (m.name.as_str(), m))
        .collect();

    let mut provided: HashSet<String> = HashSet::new();
    let mut diagnostics = Vec::new();
    for name in &ir.app.middleware {
        let Some(middleware) = by_name.get(name.as_str()) else {
            continue;
        };
        if let Some(shape) = middleware.requires.as_ref().and_then(|r| r.shape()) {
            for key in context_keys(shape) {
                if !provided.contains(&key) {
                    diagnostics.push(
                        Diagnostic::error(
                            DiagnosticCode::MiddlewareRequirement,
                            format!(
                                "Middleware '{}' requires context key '{}' which is not provided by any earlier middleware",
                                middleware.name, key
                            ),
                        )
                        .with_location(middleware.location.as_ref()),
                    );
                }
            }
        }
        if let Some(shape) = middleware.provides.as_ref().and_then(|r| r.shape()) {
            provided.extend(context_keys(shape));
        }
    }
    diagnostics
}

// (f) Registration options must agree with the module's options schema.
fn check_registration_options(ir: &AppIr) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for registration in &ir.app.registrations {
        let Some(module) = ir.module(&registration.module) else {
            continue;
        };
        if registration.has_options && module.options_schema.is_none() {
            diagnostics.push(
                Diagnostic::warning(
                    DiagnosticCode::UnexpectedOptions,
                    format!(
                        "Module '{}' is registered with options but does not declare an options schema",
                        module.name
                    ),
                )
                .with_location(registration.location.as_ref()),
            );
        }
        if module.options_schema.is_some() && !registration.has_options {
            diagnostics.push(
                Diagnostic::error(
                    DiagnosticCode::MissingOptions,
                    format!(
                        "Module '{}' requires options but the registration does not supply any",
                        module.name
                    ),
                )
                .with_location(registration.location.as_ref()),
            );
        }
    }
    diagnostics
}

/// `:param` segment names of a resolved path.
fn path_params(full_path: &str) -> Vec<&str> {
    full_path
        .split('/')
        .filter_map(|segment| segment.strip_prefix(':'))
        .filter(|name| !name.is_empty())
        .collect()
}

// (g) Path parameters and params-schema properties must agree, checked
// independently in both directions.
fn check_path_params(ir: &AppIr) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for (_, _, route) in ir.routes() {
        let Some(shape) = route.params.as_ref().and_then(|r| r.shape()) else {
            continue;
        };
        let properties = context_keys(shape);
        let declared: HashSet<&str> = properties.iter().map(String::as_str).collect();
        let in_path = path_params(&route.full_path);

        for param in &in_path {
            if !declared.contains(param) {
                diagnostics.push(
                    Diagnostic::error(
                        DiagnosticCode::PathParamMissing,
                        format!(
                            "Route '{}' declares path parameter ':{}' which is missing from its params schema",
                            route.operation_id, param
                        ),
                    )
                    .with_location(route.location.as_ref()),
                );
            }
        }
        let in_path: HashSet<&str> = in_path.into_iter().collect();
        for property in &properties {
            if !in_path.contains(property.as_str()) {
                diagnostics.push(
                    Diagnostic::warning(
                        DiagnosticCode::PathParamUnused,
                        format!(
                            "Params schema property '{}' of route '{}' is not a path parameter",
                            property, route.operation_id
                        ),
                    )
                    .with_location(route.location.as_ref()),
                );
            }
        }
    }
    diagnostics
}

// (h) `{METHOD} {fullPath}` must be unique across all routers.
fn check_duplicate_paths(ir: &AppIr) -> Vec<Diagnostic> {
    let mut first_seen: HashMap<String, &str> = HashMap::new();
    let mut diagnostics = Vec::new();
    for (_, router, route) in ir.routes() {
        let key = format!("{} {}", route.method.as_str(), route.full_path);
        match first_seen.get(key.as_str()) {
            Some(first_router) => {
                diagnostics.push(
                    Diagnostic::error(
                        DiagnosticCode::DuplicateRoute,
                        format!(
                            "Route '{key}' is declared in both router '{first_router}' and router '{}'",
                            router.name
                        ),
                    )
                    .with_location(route.location.as_ref()),
                );
            }
            None => {
                first_seen.insert(key, router.name.as_str());
            }
        }
    }
    diagnostics
}

// (i) Provided context keys: reserved names, duplicate providers, and
// collisions with injection tokens.
fn check_context_keys(ir: &AppIr) -> Vec<Diagnostic> {
    let injection_tokens = all_injection_tokens(ir);
    let mut first_provider: HashMap<String, &str> = HashMap::new();
    let mut diagnostics = Vec::new();

    for middleware in &ir.middlewares {
        let Some(shape) = middleware.provides.as_ref().and_then(|r| r.shape()) else {
            continue;
        };
        for key in context_keys(shape) {
            if RESERVED_CONTEXT_KEYS.contains(&key.as_str()) {
                diagnostics.push(
                    Diagnostic::error(
                        DiagnosticCode::ReservedContextKey,
                        format!(
                            "Middleware '{}' provides reserved context key '{}'",
                            middleware.name, key
                        ),
                    )
                    .with_location(middleware.location.as_ref()),
                );
                continue;
            }

            match first_provider.get(key.as_str()) {
                Some(first) => {
                    diagnostics.push(
                        Diagnostic::error(
                            DiagnosticCode::ContextKeyConflict,
                            format!(
                                "Middleware '{}' provides context key '{}' which is already provided by middleware '{first}'",
                                middleware.name, key
                            ),
                        )
                        .with_location(middleware.location.as_ref()),
                    );
                }
                None => {
                    first_provider.insert(key.clone(), middleware.name.as_str());
                }
            }

            if injection_tokens.contains(key.as_str()) {
                diagnostics.push(
                    Diagnostic::error(
                        DiagnosticCode::ContextKeyShadowsInjection,
                        format!(
                            "Context key '{}' provided by middleware '{}' collides with an injection token of the same name",
                            key, middleware.name
                        ),
                    )
                    .with_location(middleware.location.as_ref()),
                );
            }
        }
    }
    diagnostics
}

// (j) Route path templates must start with '/'.
fn check_path_format(ir: &AppIr) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for (_, _, route) in ir.routes() {
        if !route.path.starts_with('/') {
            diagnostics.push(
                Diagnostic::error(
                    DiagnosticCode::RoutePathFormat,
                    format!("Route path '{}' must start with '/'", route.path),
                )
                .with_suggestion(format!("/{}", route.path))
                .with_location(route.location.as_ref()),
            );
        }
    }
    diagnostics
}
