//! Generator capability trait.
//!
//! Generators consume a finished IR snapshot and emit artifacts (OpenAPI
//! documents, typed clients, route tables) as a side effect. The concrete
//! renderers live outside this crate; the compiler only fans them out and
//! waits for all of them.

use std::path::Path;

use async_trait::async_trait;

use crate::diagnostic::CompilerError;
use crate::ir::AppIr;

/// A pluggable artifact emitter over a finished IR.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Name used in fault reports.
    fn name(&self) -> &str;

    /// Emits artifacts for `ir` into `out_dir`. Results are not collected;
    /// a fault aborts the joint wait of all generators.
    async fn generate(&self, ir: &AppIr, out_dir: &Path) -> Result<(), CompilerError>;
}
