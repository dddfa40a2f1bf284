//! Diagnostic types for structural findings and collaborator faults.
//!
//! Structural findings are `Diagnostic` values: they accumulate, never abort
//! a pass, and gate generation when any of them is an error. Collaborator
//! faults are `CompilerError` values and propagate with `?`.

mod error;
mod span;

pub use error::CompilerError;
pub use span::{ContextLine, SourceContext, SourceLocation};

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How serious a finding is.
///
/// Ordering is ascending: `Info < Warning < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// Fixed tags identifying each kind of finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    SchemaNaming,
    SchemaPlacement,
    MixedOperations,
    MixedEntities,
    UnknownExport,
    ServiceOwnership,
    CircularDependency,
    MissingResponse,
    UnreferencedService,
    UnreferencedSchema,
    UnresolvedInjection,
    MiddlewareRequirement,
    UnexpectedOptions,
    MissingOptions,
    PathParamMissing,
    PathParamUnused,
    DuplicateRoute,
    ReservedContextKey,
    ContextKeyConflict,
    ContextKeyShadowsInjection,
    RoutePathFormat,
    OperationIdCollision,
    SchemaShapeUnresolvable,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::SchemaNaming => "armature::naming::schema_name",
            DiagnosticCode::SchemaPlacement => "armature::placement::schema_location",
            DiagnosticCode::MixedOperations => "armature::placement::mixed_operations",
            DiagnosticCode::MixedEntities => "armature::placement::mixed_entities",
            DiagnosticCode::UnknownExport => "armature::module::unknown_export",
            DiagnosticCode::ServiceOwnership => "armature::module::service_ownership",
            DiagnosticCode::CircularDependency => "armature::module::circular_dependency",
            DiagnosticCode::MissingResponse => "armature::completeness::missing_response",
            DiagnosticCode::UnreferencedService => "armature::completeness::unreferenced_service",
            DiagnosticCode::UnreferencedSchema => "armature::completeness::unreferenced_schema",
            DiagnosticCode::UnresolvedInjection => "armature::completeness::unresolved_injection",
            DiagnosticCode::MiddlewareRequirement => {
                "armature::completeness::middleware_requirement"
            }
            DiagnosticCode::UnexpectedOptions => "armature::completeness::unexpected_options",
            DiagnosticCode::MissingOptions => "armature::completeness::missing_options",
            DiagnosticCode::PathParamMissing => "armature::completeness::path_param_missing",
            DiagnosticCode::PathParamUnused => "armature::completeness::path_param_unused",
            DiagnosticCode::DuplicateRoute => "armature::completeness::duplicate_route",
            DiagnosticCode::ReservedContextKey => "armature::completeness::reserved_context_key",
            DiagnosticCode::ContextKeyConflict => "armature::completeness::context_key_conflict",
            DiagnosticCode::ContextKeyShadowsInjection => {
                "armature::completeness::context_key_shadows_injection"
            }
            DiagnosticCode::RoutePathFormat => "armature::completeness::route_path_format",
            DiagnosticCode::OperationIdCollision => "armature::entities::operation_id_collision",
            DiagnosticCode::SchemaShapeUnresolvable => "armature::schema::shape_unresolvable",
        }
    }
}

/// A single structural finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
    pub file: Option<PathBuf>,
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub suggestion: Option<String>,
    pub source_context: Option<SourceContext>,
}

impl Diagnostic {
    pub fn new(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            file: None,
            line: None,
            column: None,
            suggestion: None,
            source_context: None,
        }
    }

    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    pub fn info(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, code, message)
    }

    /// Attaches a source location, if one is known.
    pub fn with_location(mut self, location: Option<&SourceLocation>) -> Self {
        if let Some(loc) = location {
            self.file = Some(loc.file.clone());
            self.line = Some(loc.line);
            self.column = Some(loc.column);
        }
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_source_context(mut self, context: SourceContext) -> Self {
        self.source_context = Some(context);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity.as_str(), self.message)?;
        if let (Some(file), Some(line)) = (&self.file, self.line) {
            write!(f, " ({}:{})", file.display(), line)?;
        }
        Ok(())
    }
}

/// Concatenates diagnostic batches, preserving batch and in-batch order.
pub fn merge_diagnostics(batches: Vec<Vec<Diagnostic>>) -> Vec<Diagnostic> {
    batches.into_iter().flatten().collect()
}

/// Keeps only diagnostics at exactly the given severity.
pub fn filter_by_severity(diagnostics: &[Diagnostic], severity: Severity) -> Vec<Diagnostic> {
    diagnostics
        .iter()
        .filter(|d| d.severity == severity)
        .cloned()
        .collect()
}

/// True if any diagnostic in the slice is an error.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

/// Upgrades every warning to an error (strict mode).
pub fn promote_warnings(diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
    diagnostics
        .into_iter()
        .map(|mut d| {
            if d.severity == Severity::Warning {
                d.severity = Severity::Error;
            }
            d
        })
        .collect()
}
