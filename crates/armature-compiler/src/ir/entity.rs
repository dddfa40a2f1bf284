//! Entity intermediate representation.
//!
//! Entities are declarative resource definitions the compiler expands into
//! CRUD and custom-action routes.

use std::collections::HashMap;

use super::{HttpMethod, SchemaRef};
use crate::diagnostic::SourceLocation;

/// Whether a generated operation is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntityAccess {
    #[default]
    Allowed,
    Disabled,
}

impl EntityAccess {
    /// Parse an access value from a string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "allowed" => Some(EntityAccess::Allowed),
            "disabled" => Some(EntityAccess::Disabled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityAccess::Allowed => "allowed",
            EntityAccess::Disabled => "disabled",
        }
    }
}

/// The CRUD operations derivable from an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrudOp {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl CrudOp {
    /// All operations, in route-generation order.
    pub const ALL: [CrudOp; 5] = [
        CrudOp::List,
        CrudOp::Get,
        CrudOp::Create,
        CrudOp::Update,
        CrudOp::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CrudOp::List => "list",
            CrudOp::Get => "get",
            CrudOp::Create => "create",
            CrudOp::Update => "update",
            CrudOp::Delete => "delete",
        }
    }
}

/// A custom action declared on an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityActionIr {
    pub name: String,

    /// Explicit path suffix below `/{entity}`. When absent, the path
    /// defaults to `/{entity}/:id/{action}` (`:id` dropped when `has_id`
    /// is false).
    pub path: Option<String>,

    pub method: HttpMethod,

    /// Whether the action addresses a single entity instance.
    pub has_id: bool,

    pub input: Option<SchemaRef>,
    pub output: Option<SchemaRef>,
}

/// Resolved model schema refs for an entity, when resolution succeeded.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntityModelRefs {
    pub create: Option<SchemaRef>,
    pub update: Option<SchemaRef>,
    pub response: Option<SchemaRef>,
}

/// IR representation of an entity definition.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityIr {
    pub name: String,

    /// Per-CRUD access. Operations absent from the map are allowed.
    pub access: HashMap<CrudOp, EntityAccess>,

    /// Per-action access overrides. Actions absent from the map are allowed.
    pub action_access: HashMap<String, EntityAccess>,

    pub actions: Vec<EntityActionIr>,

    /// Resolved create/update/response schema refs, when available.
    pub model: Option<EntityModelRefs>,

    pub location: Option<SourceLocation>,
}

impl EntityIr {
    /// A bare entity with every operation allowed and no actions.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            access: HashMap::new(),
            action_access: HashMap::new(),
            actions: Vec::new(),
            model: None,
            location: None,
        }
    }

    pub fn crud_access(&self, op: CrudOp) -> EntityAccess {
        self.access.get(&op).copied().unwrap_or_default()
    }

    pub fn action_allowed(&self, action: &str) -> bool {
        self.action_access
            .get(action)
            .copied()
            .unwrap_or_default()
            == EntityAccess::Allowed
    }
}
