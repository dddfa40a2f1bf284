//! Schema placement validation.
//!
//! Schemas live under a `schemas/` directory (any depth) in files using the
//! recognized suffix, and a schema file should stick to one operation and
//! one entity.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use async_trait::async_trait;

use super::Validator;
use crate::convention::{is_under_schemas_dir, SCHEMA_FILE_SUFFIX};
use crate::diagnostic::{CompilerError, Diagnostic, DiagnosticCode};
use crate::ir::{AppIr, SchemaIr};

pub struct PlacementValidator;

#[async_trait]
impl Validator for PlacementValidator {
    fn name(&self) -> &str {
        "placement"
    }

    async fn validate(&self, ir: &AppIr) -> Result<Vec<Diagnostic>, CompilerError> {
        let mut diagnostics = Vec::new();

        for schema in ir.schemas.iter().filter(|s| s.is_named) {
            diagnostics.extend(check_location(schema));
        }

        // Group named schemas by file for the mixed-content checks.
        let mut by_file: BTreeMap<&PathBuf, Vec<&SchemaIr>> = BTreeMap::new();
        for schema in ir.schemas.iter().filter(|s| s.is_named) {
            by_file.entry(&schema.file).or_default().push(schema);
        }
        for (file, schemas) in by_file {
            diagnostics.extend(check_mixed_content(file, &schemas));
        }

        Ok(diagnostics)
    }
}

/// Sequential, short-circuiting location checks: directory first, then
/// filename suffix.
fn check_location(schema: &SchemaIr) -> Option<Diagnostic> {
    if !is_under_schemas_dir(&schema.file) {
        return Some(
            Diagnostic::warning(
                DiagnosticCode::SchemaPlacement,
                format!(
                    "Schema '{}' should live under a schemas/ directory",
                    schema.name
                ),
            )
            .with_location(schema.location.as_ref()),
        );
    }

    let file_name = schema
        .file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    if !file_name.ends_with(SCHEMA_FILE_SUFFIX) {
        return Some(
            Diagnostic::warning(
                DiagnosticCode::SchemaPlacement,
                format!(
                    "Schema '{}' is declared in '{}' which does not use the '{}' suffix",
                    schema.name, file_name, SCHEMA_FILE_SUFFIX
                ),
            )
            .with_location(schema.location.as_ref()),
        );
    }

    None
}

/// One warning per file for mixed operations, one for mixed entities.
fn check_mixed_content(file: &PathBuf, schemas: &[&SchemaIr]) -> Vec<Diagnostic> {
    let operations: HashSet<&str> = schemas
        .iter()
        .filter_map(|s| s.naming.operation.map(|op| op.as_str()))
        .collect();
    let entities: HashSet<&str> = schemas
        .iter()
        .filter_map(|s| s.naming.entity.as_deref())
        .collect();

    let mut diagnostics = Vec::new();
    if operations.len() >= 2 {
        diagnostics.push(Diagnostic::warning(
            DiagnosticCode::MixedOperations,
            format!(
                "Schema file '{}' mixes schemas for multiple operations",
                file.display()
            ),
        ));
    }
    if entities.len() >= 2 {
        diagnostics.push(Diagnostic::warning(
            DiagnosticCode::MixedEntities,
            format!(
                "Schema file '{}' mixes schemas for multiple entities",
                file.display()
            ),
        ));
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn run(schemas: Vec<SchemaIr>) -> Vec<Diagnostic> {
        let mut ir = AppIr::empty();
        ir.schemas = schemas;
        PlacementValidator.validate(&ir).await.unwrap()
    }

    #[tokio::test]
    async fn conforming_schema_passes() {
        let diagnostics = run(vec![SchemaIr::named(
            "createUserBody",
            "src/modules/user/schemas/user.schemas.ts",
        )])
        .await;
        assert!(diagnostics.is_empty());
    }

    #[tokio::test]
    async fn outside_schemas_dir_short_circuits_suffix_check() {
        // Wrong directory and wrong suffix: only the directory warning fires.
        let diagnostics = run(vec![SchemaIr::named(
            "createUserBody",
            "src/modules/user/user.ts",
        )])
        .await;
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::SchemaPlacement);
        assert!(diagnostics[0].message.contains("schemas/ directory"));
    }

    #[tokio::test]
    async fn wrong_suffix_warns() {
        let diagnostics = run(vec![SchemaIr::named(
            "createUserBody",
            "src/modules/user/schemas/user.ts",
        )])
        .await;
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("'.schemas.ts'"));
    }

    #[tokio::test]
    async fn mixed_operations_reported_once_per_file() {
        let file = "src/modules/user/schemas/user.schemas.ts";
        let diagnostics = run(vec![
            SchemaIr::named("createUserBody", file),
            SchemaIr::named("updateUserBody", file),
            SchemaIr::named("deleteUserParams", file),
        ])
        .await;
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::MixedOperations);
    }

    #[tokio::test]
    async fn mixed_entities_reported_once_per_file() {
        let file = "src/modules/user/schemas/user.schemas.ts";
        let diagnostics = run(vec![
            SchemaIr::named("createUserBody", file),
            SchemaIr::named("createOrderBody", file),
        ])
        .await;
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::MixedEntities);
    }
}
