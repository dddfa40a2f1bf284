//! Schema naming validation.
//!
//! Named schemas must follow the `{operation}{Entity}{Part}` convention,
//! e.g. `createUserBody` or `listOrderResponse`.

use async_trait::async_trait;

use super::Validator;
use crate::diagnostic::{CompilerError, Diagnostic, DiagnosticCode};
use crate::ir::{parse_schema_name, AppIr, SchemaOperation, SchemaPart};

pub struct NamingValidator;

#[async_trait]
impl Validator for NamingValidator {
    fn name(&self) -> &str {
        "naming"
    }

    async fn validate(&self, ir: &AppIr) -> Result<Vec<Diagnostic>, CompilerError> {
        let mut diagnostics = Vec::new();
        for schema in ir.schemas.iter().filter(|s| s.is_named) {
            let parts = parse_schema_name(&schema.name);
            if parts.operation.is_some() && parts.entity.is_some() && parts.part.is_some() {
                continue;
            }

            let mut diagnostic = Diagnostic::warning(
                DiagnosticCode::SchemaNaming,
                format!(
                    "Schema '{}' does not follow the '{{operation}}{{Entity}}{{Part}}' naming convention",
                    schema.name
                ),
            )
            .with_location(schema.location.as_ref());
            if let Some(corrected) = case_corrected_name(&schema.name) {
                diagnostic = diagnostic.with_suggestion(format!("Rename to '{corrected}'"));
            }
            diagnostics.push(diagnostic);
        }
        Ok(diagnostics)
    }
}

/// Attempts a case-insensitive parse and returns the correctly-cased name
/// when one exists and differs from the input.
fn case_corrected_name(name: &str) -> Option<String> {
    let lower = name.to_lowercase();
    let operation = SchemaOperation::ALL
        .into_iter()
        .find(|op| lower.starts_with(op.as_str()))?;

    // A lowercase match on an ASCII prefix implies the original prefix is
    // ASCII too, so this offset sits on a char boundary.
    let remainder = &name[operation.as_str().len()..];
    let part = SchemaPart::ALL.into_iter().find(|p| {
        remainder.len() > p.as_str().len()
            && remainder.is_char_boundary(remainder.len() - p.as_str().len())
            && remainder[remainder.len() - p.as_str().len()..].eq_ignore_ascii_case(p.as_str())
    })?;

    let entity = &remainder[..remainder.len() - part.as_str().len()];
    let mut chars = entity.chars();
    let first = chars.next()?;
    let corrected = format!(
        "{}{}{}{}",
        operation.as_str(),
        first.to_uppercase(),
        chars.as_str(),
        part.as_str()
    );
    (corrected != name).then_some(corrected)
}
