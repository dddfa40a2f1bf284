//! Incremental recompilation.
//!
//! The incremental compiler wraps a [`Compiler`] and holds the single
//! "current" IR between passes. A change batch is categorized, then handled
//! by the dominating policy: reboot beats full recompile beats targeted.
//! Targeted passes still re-run every analyzer; what makes them targeted is
//! the merge-by-name reconciliation into the current IR and the
//! affected-module report.

pub mod categorize;

pub use categorize::{ChangeKind, ChangeSet, FileCategory, FileChange, RebootReason};

use std::collections::{HashMap, HashSet};

use crate::diagnostic::{self, CompilerError, Diagnostic};
use crate::ir::{builder, AppIr, ModuleIr};
use crate::{CompileOutcome, Compiler};

/// How a change batch was handled.
#[derive(Debug)]
pub enum RecompileOutcome {
    /// Targeted pass: re-analyzed, merged by name, re-validated, and
    /// re-generated when clean.
    Incremental {
        affected_modules: Vec<String>,
        diagnostics: Vec<Diagnostic>,
    },

    /// The whole pipeline re-ran and the current IR was replaced.
    FullRecompile,

    /// The process must restart; no analysis was performed.
    Reboot { reason: Option<RebootReason> },
}

/// Watch-mode wrapper around a [`Compiler`].
///
/// The current IR is the sole persistent mutable state; the last completed
/// pass wins. `&mut self` on every pass entry point leaves serialization of
/// concurrent batches to the caller.
pub struct IncrementalCompiler {
    compiler: Compiler,
    current: AppIr,
}

impl IncrementalCompiler {
    /// Wraps a compiler. The current IR starts empty until
    /// [`initial_compile`](Self::initial_compile) runs.
    pub fn new(compiler: Compiler) -> Self {
        Self {
            compiler,
            current: AppIr::empty(),
        }
    }

    /// The IR of the last completed pass.
    pub fn current_ir(&self) -> &AppIr {
        &self.current
    }

    /// Runs the full pipeline once and adopts its IR as current.
    pub async fn initial_compile(&mut self) -> Result<CompileOutcome, CompilerError> {
        let outcome = self.compiler.compile().await?;
        self.current = outcome.ir.clone();
        Ok(outcome)
    }

    /// Handles one change batch.
    pub async fn handle_changes(
        &mut self,
        changes: &[FileChange],
    ) -> Result<RecompileOutcome, CompilerError> {
        let set = categorize::categorize_changes(changes, &self.compiler.config().entry_file);

        // Reboot dominates: no analysis at all, even if the batch would
        // also qualify for a full recompile.
        if set.requires_reboot {
            return Ok(RecompileOutcome::Reboot {
                reason: set.reboot_reason,
            });
        }

        if set.requires_full_recompile {
            let outcome = self.compiler.compile().await?;
            self.current = outcome.ir;
            return Ok(RecompileOutcome::FullRecompile);
        }

        // Targeted (or empty) batch: re-analyze everything, reconcile by
        // name, re-derive diagnostics from scratch.
        let fresh = self.compiler.analyze().await?;
        let merged = merge_app_ir(&self.current, &fresh);
        let validation = self.compiler.validate(&merged).await?;
        let mut merged = builder::append_diagnostics(&merged, &validation);
        if self.compiler.config().strict {
            merged.diagnostics = diagnostic::promote_warnings(merged.diagnostics);
        }

        if !diagnostic::has_errors(&merged.diagnostics) {
            self.compiler.generate(&merged).await?;
        }

        let affected_modules = affected_modules(&merged, &set);
        let diagnostics = merged.diagnostics.clone();
        self.current = merged;

        Ok(RecompileOutcome::Incremental {
            affected_modules,
            diagnostics,
        })
    }
}

/// Reconciles a fresh analysis pass into the current IR.
///
/// Named collections merge by name: a fresh entry with a matching name
/// replaces the current one, untouched current entries are preserved, and
/// fresh-only entries append. The app definition and env fragment follow
/// the fresh pass wholesale, the dependency graph only when the fresh pass
/// produced a non-empty one. Diagnostics reset to the fresh pass's; the
/// caller re-derives validation findings afterwards.
pub fn merge_app_ir(current: &AppIr, fresh: &AppIr) -> AppIr {
    AppIr {
        app: fresh.app.clone(),
        env: fresh.env.clone(),
        modules: merge_by_name(&current.modules, &fresh.modules, |m| m.name.as_str()),
        middlewares: merge_by_name(&current.middlewares, &fresh.middlewares, |m| {
            m.name.as_str()
        }),
        schemas: merge_by_name(&current.schemas, &fresh.schemas, |s| s.name.as_str()),
        entities: merge_by_name(&current.entities, &fresh.entities, |e| e.name.as_str()),
        dependency_graph: if fresh.dependency_graph.is_empty() {
            current.dependency_graph.clone()
        } else {
            fresh.dependency_graph.clone()
        },
        diagnostics: fresh.diagnostics.clone(),
    }
}

fn merge_by_name<T: Clone>(current: &[T], fresh: &[T], name: impl Fn(&T) -> &str) -> Vec<T> {
    let fresh_by_name: HashMap<&str, &T> = fresh.iter().map(|item| (name(item), item)).collect();
    let current_names: HashSet<&str> = current.iter().map(&name).collect();

    let mut merged: Vec<T> = current
        .iter()
        .map(|item| match fresh_by_name.get(name(item)) {
            Some(replacement) => (*replacement).clone(),
            None => item.clone(),
        })
        .collect();
    merged.extend(
        fresh
            .iter()
            .filter(|&item| !current_names.contains(name(item)))
            .cloned(),
    );
    merged
}

/// Modules whose owning source artifacts intersect the change batch.
///
/// Module files match by exact location, service and router files through
/// the owning module, and schema files by segment-wise containment in the
/// module's own directory. Output order follows the module order of the IR,
/// so each module appears at most once.
fn affected_modules(ir: &AppIr, set: &ChangeSet) -> Vec<String> {
    ir.modules
        .iter()
        .filter(|module| module_is_affected(module, set))
        .map(|module| module.name.clone())
        .collect()
}

fn module_is_affected(module: &ModuleIr, set: &ChangeSet) -> bool {
    if set.module_changes.iter().any(|change| {
        module
            .location
            .as_ref()
            .is_some_and(|l| l.file == change.path)
    }) {
        return true;
    }

    let owns_changed_member = set
        .service_changes
        .iter()
        .chain(&set.router_changes)
        .any(|change| {
            module
                .services
                .iter()
                .any(|s| s.location.as_ref().is_some_and(|l| l.file == change.path))
                || module
                    .routers
                    .iter()
                    .any(|r| r.location.as_ref().is_some_and(|l| l.file == change.path))
        });
    if owns_changed_member {
        return true;
    }

    let Some(dir) = module.location.as_ref().and_then(|l| l.file.parent()) else {
        return false;
    };
    set.schema_changes
        .iter()
        .any(|change| change.path.starts_with(dir))
}
