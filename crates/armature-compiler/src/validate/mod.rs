//! Validation of the application IR.
//!
//! Validators are independent rule-checkers: each inspects a complete IR
//! snapshot and returns diagnostics, never mutating. The compiler runs them
//! in registration order so diagnostic ordering is stable, and concatenates
//! the results.

mod completeness;
mod module;
mod naming;
mod placement;

pub use completeness::{CompletenessValidator, RESERVED_CONTEXT_KEYS};
pub use module::ModuleValidator;
pub use naming::NamingValidator;
pub use placement::PlacementValidator;

use async_trait::async_trait;

use crate::diagnostic::{CompilerError, Diagnostic};
use crate::ir::AppIr;

/// An independent rule-checker over the full IR.
#[async_trait]
pub trait Validator: Send + Sync {
    /// Name used in fault reports.
    fn name(&self) -> &str;

    /// Checks the IR and returns findings. Must be deterministic and must
    /// not mutate anything observable.
    async fn validate(&self, ir: &AppIr) -> Result<Vec<Diagnostic>, CompilerError>;
}

/// The built-in validator pipeline, in its canonical order.
pub fn default_validators() -> Vec<Box<dyn Validator>> {
    vec![
        Box::new(NamingValidator),
        Box::new(PlacementValidator),
        Box::new(ModuleValidator),
        Box::new(CompletenessValidator),
    ]
}
