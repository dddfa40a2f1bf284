//! # Armature Compiler
//!
//! Static-analysis build pipeline for declarative Armature applications.
//! Analyzers read the convention-based source tree (modules, services,
//! routers, middleware, schemas, entities) into a structured intermediate
//! representation, validators check architectural invariants over it, and
//! generators derive artifacts from it when validation allows.
//!
//! ## Architecture
//!
//! ```text
//! Source tree
//!      │
//!      ▼
//! ┌──────────────┐
//! │  Analyzers   │  One typed fragment per role
//! │ (src → IR)   │
//! └──────┬───────┘
//!        │ fold + enrich + entity routes
//!        ▼
//! ┌──────────────┐
//! │    AppIr     │  Immutable snapshot per pass
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │  Validators  │  Structural diagnostics
//! └──────┬───────┘
//!        │ gate: no errors (or force)
//!        ▼
//! ┌──────────────┐
//! │  Generators  │  Artifacts (side effect)
//! └──────────────┘
//! ```
//!
//! In watch mode the [`incremental::IncrementalCompiler`] wraps the
//! pipeline: it classifies change batches, merges re-analysis results into
//! its current IR by name, and reports the affected modules.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use armature_compiler::{Compiler, CompilerConfig};
//!
//! let mut compiler = Compiler::new(config, analyzers);
//! compiler.add_generator(Box::new(openapi_generator));
//! let outcome = compiler.compile().await?;
//! ```

pub mod analyzer;
pub mod config;
pub mod convention;
pub mod diagnostic;
pub mod entity_routes;
pub mod generate;
pub mod incremental;
pub mod ir;
pub mod typecheck;
pub mod validate;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::CompilerConfig;
pub use diagnostic::{CompilerError, Diagnostic, Severity};
pub use ir::AppIr;

use analyzer::AnalyzerSet;
use generate::Generator;
use ir::builder;
use validate::Validator;

/// The main compiler: orchestrates analyze → validate → gate → generate.
pub struct Compiler {
    config: CompilerConfig,
    analyzers: AnalyzerSet,
    validators: Vec<Box<dyn Validator>>,
    generators: Vec<Box<dyn Generator>>,
}

/// Result of a full compilation pass.
#[derive(Debug)]
pub struct CompileOutcome {
    /// True when no error diagnostic was produced. Independent of whether
    /// generation ran (`force_generate` can generate despite errors).
    pub success: bool,

    /// The finished IR, diagnostics included.
    pub ir: AppIr,

    /// All diagnostics of the pass: analyzers, collision detection, and
    /// validators, in that order.
    pub diagnostics: Vec<Diagnostic>,
}

impl Compiler {
    /// Creates a compiler with the built-in validator pipeline and no
    /// generators.
    pub fn new(config: CompilerConfig, analyzers: AnalyzerSet) -> Self {
        Self {
            config,
            analyzers,
            validators: validate::default_validators(),
            generators: Vec::new(),
        }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Appends a validator. Validators run in registration order.
    pub fn add_validator(&mut self, validator: Box<dyn Validator>) {
        self.validators.push(validator);
    }

    /// Replaces the validator pipeline.
    pub fn set_validators(&mut self, validators: Vec<Box<dyn Validator>>) {
        self.validators = validators;
    }

    /// Appends a generator.
    pub fn add_generator(&mut self, generator: Box<dyn Generator>) {
        self.generators.push(generator);
    }

    /// Runs every analyzer and folds the fragments into a fresh IR.
    ///
    /// Analyzers run in sequence; each writes a disjoint slot of the IR, so
    /// assembly is a total, non-overlapping merge. Schema enrichment and
    /// entity route injection run after all analyzers completed, since they
    /// read across slots.
    pub async fn analyze(&mut self) -> Result<AppIr, CompilerError> {
        let mut ir = AppIr::empty();
        let mut diagnostics = Vec::new();

        ir.env = self.analyzers.env.analyze().await?;
        diagnostics.extend(self.analyzers.env.diagnostics());
        ir.schemas = self.analyzers.schema.analyze().await?;
        diagnostics.extend(self.analyzers.schema.diagnostics());
        ir.middlewares = self.analyzers.middleware.analyze().await?;
        diagnostics.extend(self.analyzers.middleware.diagnostics());
        ir.modules = self.analyzers.module.analyze().await?;
        diagnostics.extend(self.analyzers.module.diagnostics());
        ir.app = self.analyzers.app.analyze().await?;
        diagnostics.extend(self.analyzers.app.diagnostics());
        ir.dependency_graph = self.analyzers.graph.analyze().await?;
        diagnostics.extend(self.analyzers.graph.diagnostics());
        if let Some(entity) = self.analyzers.entity.as_mut() {
            ir.entities = entity.analyze().await?;
            diagnostics.extend(entity.diagnostics());
        }

        let mut ir = builder::enrich_schema_module_names(&ir);
        if !ir.entities.is_empty() {
            entity_routes::inject_entity_routes(&mut ir);
            diagnostics.extend(entity_routes::detect_route_collisions(&ir));
        }

        Ok(builder::append_diagnostics(&ir, &diagnostics))
    }

    /// Runs every validator against the same IR snapshot and concatenates
    /// the results in registration order.
    pub async fn validate(&self, ir: &AppIr) -> Result<Vec<Diagnostic>, CompilerError> {
        let mut diagnostics = Vec::new();
        for validator in &self.validators {
            diagnostics.extend(validator.validate(ir).await?);
        }
        Ok(diagnostics)
    }

    /// Fans out every generator against the same IR snapshot and waits for
    /// all of them. A fault in any one aborts the joint wait.
    pub async fn generate(&self, ir: &AppIr) -> Result<(), CompilerError> {
        futures::future::try_join_all(
            self.generators
                .iter()
                .map(|g| g.generate(ir, &self.config.output_dir)),
        )
        .await?;
        Ok(())
    }

    /// Runs the full pipeline.
    ///
    /// Generation is gated on the absence of error diagnostics unless
    /// `force_generate` is set. Collaborator faults are not caught here;
    /// they abort the pass.
    pub async fn compile(&mut self) -> Result<CompileOutcome, CompilerError> {
        let ir = self.analyze().await?;
        let validation = self.validate(&ir).await?;

        let mut ir = builder::append_diagnostics(&ir, &validation);
        if self.config.strict {
            ir.diagnostics = diagnostic::promote_warnings(ir.diagnostics);
        }

        let has_error = diagnostic::has_errors(&ir.diagnostics);
        if !has_error || self.config.force_generate {
            self.generate(&ir).await?;
        }

        Ok(CompileOutcome {
            success: !has_error,
            diagnostics: ir.diagnostics.clone(),
            ir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticCode;
    use crate::entity_routes::ENTITY_MODULE_NAME;
    use crate::ir::{EntityIr, SchemaIr};
    use crate::testutil::{
        analyzer_set, module_fixture, CountingGenerator, FailingGenerator, Fixture,
        StaticValidator,
    };
    use std::sync::atomic::Ordering;

    fn compiler_with(fixture: Fixture) -> Compiler {
        let (analyzers, _) = analyzer_set(fixture);
        Compiler::new(CompilerConfig::default(), analyzers)
    }

    #[tokio::test]
    async fn analyze_folds_fragments_into_disjoint_slots() {
        let mut compiler = compiler_with(Fixture {
            modules: vec![module_fixture("user")],
            schemas: vec![SchemaIr::named("createUserBody", "schemas/user.schemas.ts")],
            ..Fixture::default()
        });

        let ir = compiler.analyze().await.unwrap();
        assert_eq!(ir.modules.len(), 1);
        assert_eq!(ir.schemas.len(), 1);
        assert!(ir.entities.is_empty());
        assert!(ir.module(ENTITY_MODULE_NAME).is_none());
    }

    #[tokio::test]
    async fn analyze_injects_entity_routes_and_detects_collisions() {
        let entity = EntityIr::named("user");
        let mut compiler = compiler_with(Fixture {
            // The fixture module already declares operationId "listUser".
            modules: vec![module_fixture("user")],
            entities: Some(vec![entity]),
            ..Fixture::default()
        });

        let ir = compiler.analyze().await.unwrap();
        assert!(ir.module(ENTITY_MODULE_NAME).is_some());
        let collisions: Vec<&Diagnostic> = ir
            .diagnostics
            .iter()
            .filter(|d| d.code == DiagnosticCode::OperationIdCollision)
            .collect();
        assert_eq!(collisions.len(), 1);
        assert!(collisions[0].message.contains("'listUser'"));
    }

    #[tokio::test]
    async fn compile_gates_generation_on_errors() {
        let mut compiler = compiler_with(Fixture {
            modules: vec![module_fixture("user")],
            ..Fixture::default()
        });
        compiler.add_validator(Box::new(StaticValidator {
            diagnostics: vec![Diagnostic::error(
                DiagnosticCode::DuplicateRoute,
                "synthetic failure",
            )],
        }));
        let (generator, calls) = CountingGenerator::new();
        compiler.add_generator(Box::new(generator));

        let outcome = compiler.compile().await.unwrap();
        assert!(!outcome.success);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(outcome
            .diagnostics
            .iter()
            .any(|d| d.message == "synthetic failure"));
    }

    #[tokio::test]
    async fn force_generate_overrides_the_gate() {
        let (analyzers, _) = analyzer_set(Fixture {
            modules: vec![module_fixture("user")],
            ..Fixture::default()
        });
        let config = CompilerConfig {
            force_generate: true,
            ..CompilerConfig::default()
        };
        let mut compiler = Compiler::new(config, analyzers);
        compiler.add_validator(Box::new(StaticValidator {
            diagnostics: vec![Diagnostic::error(
                DiagnosticCode::DuplicateRoute,
                "synthetic failure",
            )],
        }));
        let (generator, calls) = CountingGenerator::new();
        compiler.add_generator(Box::new(generator));

        let outcome = compiler.compile().await.unwrap();
        assert!(!outcome.success);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn strict_mode_promotes_warnings_before_gating() {
        let (analyzers, _) = analyzer_set(Fixture {
            modules: vec![module_fixture("user")],
            ..Fixture::default()
        });
        let config = CompilerConfig {
            strict: true,
            ..CompilerConfig::default()
        };
        let mut compiler = Compiler::new(config, analyzers);
        compiler.add_validator(Box::new(StaticValidator {
            diagnostics: vec![Diagnostic::warning(
                DiagnosticCode::UnreferencedService,
                "just a warning",
            )],
        }));
        let (generator, calls) = CountingGenerator::new();
        compiler.add_generator(Box::new(generator));

        let outcome = compiler.compile().await.unwrap();
        assert!(!outcome.success);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(outcome.diagnostics.iter().all(Diagnostic::is_error));
    }

    #[tokio::test]
    async fn clean_compile_generates_into_output_dir() {
        let out_dir = tempfile::tempdir().unwrap();
        let (analyzers, _) = analyzer_set(Fixture {
            modules: vec![module_fixture("user")],
            ..Fixture::default()
        });
        let config = CompilerConfig {
            output_dir: out_dir.path().to_path_buf(),
            ..CompilerConfig::default()
        };
        let mut compiler = Compiler::new(config, analyzers);
        let (generator, calls) = CountingGenerator::new();
        let seen = generator.out_dirs.clone();
        compiler.add_generator(Box::new(generator));

        let outcome = compiler.compile().await.unwrap();
        assert!(outcome.success);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(seen.lock().unwrap().as_slice(), &[out_dir.path().to_path_buf()]);
    }

    #[tokio::test]
    async fn failing_generator_aborts_the_joint_wait() {
        let mut compiler = compiler_with(Fixture {
            modules: vec![module_fixture("user")],
            ..Fixture::default()
        });
        let (generator, _) = CountingGenerator::new();
        compiler.add_generator(Box::new(generator));
        compiler.add_generator(Box::new(FailingGenerator));

        let result = compiler.compile().await;
        assert!(matches!(
            result,
            Err(CompilerError::GeneratorFailed { .. })
        ));
    }
}
