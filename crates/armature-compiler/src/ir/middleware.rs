//! Middleware intermediate representation.

use super::{InjectionRef, SchemaRef};
use crate::diagnostic::SourceLocation;

/// IR representation of a middleware.
///
/// The `provides` schema names the context keys the middleware adds to the
/// per-request context; `requires` names the keys it expects earlier
/// middleware to have provided. Both are the property-name sets of the
/// referenced schema shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct MiddlewareIr {
    /// Name of the middleware, unique across the application.
    pub name: String,

    pub injections: Vec<InjectionRef>,

    /// Context keys this middleware expects to be present already.
    pub requires: Option<SchemaRef>,

    /// Context keys this middleware adds.
    pub provides: Option<SchemaRef>,

    pub location: Option<SourceLocation>,
}
