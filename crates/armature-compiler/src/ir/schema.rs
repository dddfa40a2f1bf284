//! Schema intermediate representation and schema-name parsing.

use std::path::PathBuf;

use serde_json::Value;

use crate::diagnostic::SourceLocation;

/// A reference to a schema from a route slot or middleware contract.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaRef {
    /// Reference to a named, exported schema. Shape resolution is
    /// best-effort; a named ref may carry no shape.
    Named {
        name: String,
        file: PathBuf,
        shape: Option<Value>,
    },

    /// An anonymous schema declared inline at the use site.
    Inline { file: PathBuf, shape: Value },
}

impl SchemaRef {
    pub fn name(&self) -> Option<&str> {
        match self {
            SchemaRef::Named { name, .. } => Some(name),
            SchemaRef::Inline { .. } => None,
        }
    }

    pub fn shape(&self) -> Option<&Value> {
        match self {
            SchemaRef::Named { shape, .. } => shape.as_ref(),
            SchemaRef::Inline { shape, .. } => Some(shape),
        }
    }

    pub fn file(&self) -> &PathBuf {
        match self {
            SchemaRef::Named { file, .. } => file,
            SchemaRef::Inline { file, .. } => file,
        }
    }

    pub fn is_named(&self) -> bool {
        matches!(self, SchemaRef::Named { .. })
    }
}

/// The operations a schema name may encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaOperation {
    Create,
    Read,
    Update,
    List,
    Delete,
}

impl SchemaOperation {
    /// All operations, in the order name parsing tries them.
    pub const ALL: [SchemaOperation; 5] = [
        SchemaOperation::Create,
        SchemaOperation::Read,
        SchemaOperation::Update,
        SchemaOperation::List,
        SchemaOperation::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaOperation::Create => "create",
            SchemaOperation::Read => "read",
            SchemaOperation::Update => "update",
            SchemaOperation::List => "list",
            SchemaOperation::Delete => "delete",
        }
    }
}

/// The route slots a schema name may encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaPart {
    Body,
    Response,
    Query,
    Params,
    Headers,
}

impl SchemaPart {
    /// All parts, in the order name parsing tries them.
    pub const ALL: [SchemaPart; 5] = [
        SchemaPart::Body,
        SchemaPart::Response,
        SchemaPart::Query,
        SchemaPart::Params,
        SchemaPart::Headers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaPart::Body => "Body",
            SchemaPart::Response => "Response",
            SchemaPart::Query => "Query",
            SchemaPart::Params => "Params",
            SchemaPart::Headers => "Headers",
        }
    }
}

/// Result of parsing a schema name against `{operation}{Entity}{Part}`.
///
/// Each component is independently nullable: `createUserRequest` parses the
/// operation but neither entity nor part.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaNameParts {
    pub operation: Option<SchemaOperation>,
    pub entity: Option<String>,
    pub part: Option<SchemaPart>,
}

/// Parses a schema name into its `{operation}{Entity}{Part}` components.
///
/// Greedy first-match: the first operation prefix and the first part suffix
/// in declaration order win. The entity is whatever sits between them and
/// must start with an uppercase letter.
pub fn parse_schema_name(name: &str) -> SchemaNameParts {
    let Some(operation) = SchemaOperation::ALL
        .into_iter()
        .find(|op| name.starts_with(op.as_str()))
    else {
        return SchemaNameParts::default();
    };

    let remainder = &name[operation.as_str().len()..];
    let Some(part) = SchemaPart::ALL
        .into_iter()
        .find(|p| remainder.ends_with(p.as_str()))
    else {
        return SchemaNameParts {
            operation: Some(operation),
            entity: None,
            part: None,
        };
    };

    let entity = &remainder[..remainder.len() - part.as_str().len()];
    let entity = if entity.chars().next().is_some_and(|c| c.is_uppercase()) {
        Some(entity.to_string())
    } else {
        None
    };

    SchemaNameParts {
        operation: Some(operation),
        entity,
        part: Some(part),
    }
}

/// The property-name set of a schema shape's `properties` map.
///
/// This is the context-key alphabet for middleware contracts.
pub fn context_keys(shape: &Value) -> Vec<String> {
    shape
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| props.keys().cloned().collect())
        .unwrap_or_default()
}

/// IR representation of a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaIr {
    pub name: String,

    /// Explicit schema id, when one is declared.
    pub id: Option<String>,

    /// Owning module, populated by cross-reference enrichment.
    pub module_name: Option<String>,

    /// Parsed `{operation}{Entity}{Part}` components.
    pub naming: SchemaNameParts,

    /// Resolved shape, when resolution succeeded.
    pub shape: Option<Value>,

    /// Whether this schema is a named export (as opposed to inline).
    pub is_named: bool,

    /// Source file the schema is declared in.
    pub file: PathBuf,

    pub location: Option<SourceLocation>,
}

impl SchemaIr {
    /// A named schema with its naming components parsed from `name`.
    pub fn named(name: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        let name = name.into();
        let naming = parse_schema_name(&name);
        Self {
            name,
            id: None,
            module_name: None,
            naming,
            shape: None,
            is_named: true,
            file: file.into(),
            location: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_full_triple() {
        let parts = parse_schema_name("createUserBody");
        assert_eq!(parts.operation, Some(SchemaOperation::Create));
        assert_eq!(parts.entity.as_deref(), Some("User"));
        assert_eq!(parts.part, Some(SchemaPart::Body));
    }

    #[test]
    fn unknown_operation_yields_nothing() {
        let parts = parse_schema_name("getUserBody");
        assert_eq!(parts, SchemaNameParts::default());
    }

    #[test]
    fn unknown_part_keeps_operation_only() {
        let parts = parse_schema_name("createUserRequest");
        assert_eq!(parts.operation, Some(SchemaOperation::Create));
        assert_eq!(parts.entity, None);
        assert_eq!(parts.part, None);
    }

    #[test]
    fn lowercase_entity_is_rejected() {
        let parts = parse_schema_name("createuserBody");
        assert_eq!(parts.operation, Some(SchemaOperation::Create));
        assert_eq!(parts.entity, None);
        assert_eq!(parts.part, Some(SchemaPart::Body));
    }

    #[test]
    fn context_keys_read_properties() {
        let shape = json!({
            "type": "object",
            "properties": { "session": {}, "user": {} }
        });
        let keys = context_keys(&shape);
        assert_eq!(keys, vec!["session".to_string(), "user".to_string()]);
        assert!(context_keys(&json!({"type": "string"})).is_empty());
    }
}
