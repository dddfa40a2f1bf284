//! Module structure validation.
//!
//! Exports must name local services, services must agree with their
//! containing module about ownership, and dependency cycles reported by the
//! graph analyzer become errors here.

use std::collections::HashSet;

use async_trait::async_trait;

use super::Validator;
use crate::diagnostic::{CompilerError, Diagnostic, DiagnosticCode};
use crate::ir::AppIr;

/// Remediation attached to every cycle error.
const CYCLE_SUGGESTION: &str =
    "Extract the shared code into a separate module that both modules can import";

pub struct ModuleValidator;

#[async_trait]
impl Validator for ModuleValidator {
    fn name(&self) -> &str {
        "module"
    }

    async fn validate(&self, ir: &AppIr) -> Result<Vec<Diagnostic>, CompilerError> {
        let mut diagnostics = Vec::new();

        for module in &ir.modules {
            let local: HashSet<&str> = module.service_names().collect();
            for export in &module.exports {
                if !local.contains(export.as_str()) {
                    diagnostics.push(
                        Diagnostic::error(
                            DiagnosticCode::UnknownExport,
                            format!(
                                "Module '{}' exports '{}' which is not a service defined in the module",
                                module.name, export
                            ),
                        )
                        .with_location(module.location.as_ref()),
                    );
                }
            }

            for service in &module.services {
                if service.module_name != module.name {
                    diagnostics.push(
                        Diagnostic::error(
                            DiagnosticCode::ServiceOwnership,
                            format!(
                                "Service '{}' declares owning module '{}' but is defined in module '{}'",
                                service.name, service.module_name, module.name
                            ),
                        )
                        .with_location(service.location.as_ref()),
                    );
                }
            }
        }

        for cycle in &ir.dependency_graph.circular_dependencies {
            if cycle.is_empty() {
                continue;
            }
            let mut rendered = cycle.join(" -> ");
            rendered.push_str(" -> ");
            rendered.push_str(&cycle[0]);
            diagnostics.push(
                Diagnostic::error(
                    DiagnosticCode::CircularDependency,
                    format!("Circular dependency detected: {rendered}"),
                )
                .with_suggestion(CYCLE_SUGGESTION),
            );
        }

        Ok(diagnostics)
    }
}
