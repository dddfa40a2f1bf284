//! Shared test fixtures: canned analyzers, validators, and generators.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use crate::analyzer::{
    AnalyzerSet, AppAnalyzer, DependencyGraphAnalyzer, EntityAnalyzer, EnvAnalyzer,
    MiddlewareAnalyzer, ModuleAnalyzer, SchemaAnalyzer,
};
use crate::diagnostic::{CompilerError, Diagnostic, SourceLocation};
use crate::generate::Generator;
use crate::ir::{
    AppDefinition, AppIr, DependencyGraphIr, EntityIr, EnvIr, HttpMethod, MiddlewareIr, ModuleIr,
    RouteIr, RouterIr, SchemaIr, SchemaRef, ServiceIr,
};
use crate::validate::Validator;

macro_rules! fixed_analyzer {
    ($name:ident, $trait:ident, $fragment:ty) => {
        pub(crate) struct $name {
            pub value: $fragment,
            pub calls: Arc<AtomicUsize>,
            pub diagnostics: Vec<Diagnostic>,
        }

        #[async_trait]
        impl $trait for $name {
            async fn analyze(&mut self) -> Result<$fragment, CompilerError> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Ok(self.value.clone())
            }

            fn diagnostics(&self) -> Vec<Diagnostic> {
                self.diagnostics.clone()
            }
        }
    };
}

fixed_analyzer!(FixedEnvAnalyzer, EnvAnalyzer, Option<EnvIr>);
fixed_analyzer!(FixedSchemaAnalyzer, SchemaAnalyzer, Vec<SchemaIr>);
fixed_analyzer!(FixedMiddlewareAnalyzer, MiddlewareAnalyzer, Vec<MiddlewareIr>);
fixed_analyzer!(FixedModuleAnalyzer, ModuleAnalyzer, Vec<ModuleIr>);
fixed_analyzer!(FixedAppAnalyzer, AppAnalyzer, AppDefinition);
fixed_analyzer!(FixedGraphAnalyzer, DependencyGraphAnalyzer, DependencyGraphIr);
fixed_analyzer!(FixedEntityAnalyzer, EntityAnalyzer, Vec<EntityIr>);

/// The fragments a fixture analyzer set hands back, one `analyze` call
/// after another.
#[derive(Default)]
pub(crate) struct Fixture {
    pub app: AppDefinition,
    pub env: Option<EnvIr>,
    pub modules: Vec<ModuleIr>,
    pub middlewares: Vec<MiddlewareIr>,
    pub schemas: Vec<SchemaIr>,
    /// `None` means the bundle has no entity analyzer at all.
    pub entities: Option<Vec<EntityIr>>,
    pub graph: DependencyGraphIr,
}

/// Builds an analyzer bundle returning the fixture fragments. The returned
/// counter increments on every `analyze` call of any analyzer in the set.
pub(crate) fn analyzer_set(fixture: Fixture) -> (AnalyzerSet, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let set = AnalyzerSet {
        env: Box::new(FixedEnvAnalyzer {
            value: fixture.env,
            calls: calls.clone(),
            diagnostics: Vec::new(),
        }),
        schema: Box::new(FixedSchemaAnalyzer {
            value: fixture.schemas,
            calls: calls.clone(),
            diagnostics: Vec::new(),
        }),
        middleware: Box::new(FixedMiddlewareAnalyzer {
            value: fixture.middlewares,
            calls: calls.clone(),
            diagnostics: Vec::new(),
        }),
        module: Box::new(FixedModuleAnalyzer {
            value: fixture.modules,
            calls: calls.clone(),
            diagnostics: Vec::new(),
        }),
        app: Box::new(FixedAppAnalyzer {
            value: fixture.app,
            calls: calls.clone(),
            diagnostics: Vec::new(),
        }),
        graph: Box::new(FixedGraphAnalyzer {
            value: fixture.graph,
            calls: calls.clone(),
            diagnostics: Vec::new(),
        }),
        entity: fixture.entities.map(|entities| {
            Box::new(FixedEntityAnalyzer {
                value: entities,
                calls: calls.clone(),
                diagnostics: Vec::new(),
            }) as Box<dyn EntityAnalyzer>
        }),
    };
    (set, calls)
}

/// Module analyzer whose fragment can be swapped between passes, for
/// exercising incremental merges.
pub(crate) struct SharedModuleAnalyzer {
    pub value: Arc<Mutex<Vec<ModuleIr>>>,
    pub calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ModuleAnalyzer for SharedModuleAnalyzer {
    async fn analyze(&mut self) -> Result<Vec<ModuleIr>, CompilerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.value.lock().unwrap().clone())
    }

    fn diagnostics(&self) -> Vec<Diagnostic> {
        Vec::new()
    }
}

/// Like [`analyzer_set`], but the module fragment lives behind a shared
/// handle the test can rewrite between passes.
pub(crate) fn analyzer_set_with_shared_modules(
    fixture: Fixture,
) -> (AnalyzerSet, Arc<Mutex<Vec<ModuleIr>>>, Arc<AtomicUsize>) {
    let modules = Arc::new(Mutex::new(fixture.modules.clone()));
    let (mut set, calls) = analyzer_set(Fixture {
        modules: Vec::new(),
        ..fixture
    });
    set.module = Box::new(SharedModuleAnalyzer {
        value: modules.clone(),
        calls: calls.clone(),
    });
    (set, modules, calls)
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// A self-consistent module that passes every built-in validator: one
/// exported service and one router with a single GET route, all carrying
/// source locations under `src/modules/{name}/`.
pub(crate) fn module_fixture(name: &str) -> ModuleIr {
    let file = |kind: &str| PathBuf::from(format!("src/modules/{name}/{name}.{kind}.ts"));

    let service = ServiceIr {
        name: format!("{name}Service"),
        module_name: name.to_string(),
        injections: Vec::new(),
        methods: Vec::new(),
        location: Some(SourceLocation::new(file("service"), 1, 1)),
    };
    let route = RouteIr {
        method: HttpMethod::Get,
        path: format!("/{name}"),
        full_path: format!("/{name}"),
        operation_id: format!("list{}", capitalize(name)),
        params: None,
        query: None,
        body: None,
        headers: None,
        response: Some(SchemaRef::Inline {
            file: file("router"),
            shape: json!({ "type": "object" }),
        }),
        middleware: Vec::new(),
        tags: Vec::new(),
        location: Some(SourceLocation::new(file("router"), 8, 3)),
    };
    let router = RouterIr {
        name: format!("{name}Router"),
        module_name: name.to_string(),
        path_prefix: String::new(),
        injections: Vec::new(),
        routes: vec![route],
        location: Some(SourceLocation::new(file("router"), 1, 1)),
    };

    ModuleIr {
        name: name.to_string(),
        imports: Vec::new(),
        options_schema: None,
        services: vec![service],
        routers: vec![router],
        exports: vec![format!("{name}Service")],
        location: Some(SourceLocation::new(file("module"), 1, 1)),
    }
}

/// Validator that returns a fixed batch of diagnostics.
pub(crate) struct StaticValidator {
    pub diagnostics: Vec<Diagnostic>,
}

#[async_trait]
impl Validator for StaticValidator {
    fn name(&self) -> &str {
        "static"
    }

    async fn validate(&self, _ir: &AppIr) -> Result<Vec<Diagnostic>, CompilerError> {
        Ok(self.diagnostics.clone())
    }
}

/// Generator that records each invocation and its output directory.
pub(crate) struct CountingGenerator {
    pub calls: Arc<AtomicUsize>,
    pub out_dirs: Arc<Mutex<Vec<PathBuf>>>,
}

impl CountingGenerator {
    pub fn new() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                calls: calls.clone(),
                out_dirs: Arc::new(Mutex::new(Vec::new())),
            },
            calls,
        )
    }
}

#[async_trait]
impl Generator for CountingGenerator {
    fn name(&self) -> &str {
        "counting"
    }

    async fn generate(&self, _ir: &AppIr, out_dir: &Path) -> Result<(), CompilerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.out_dirs.lock().unwrap().push(out_dir.to_path_buf());
        Ok(())
    }
}

/// Generator that always faults.
pub(crate) struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(&self, _ir: &AppIr, _out_dir: &Path) -> Result<(), CompilerError> {
        Err(CompilerError::generator("failing", "intentional fault"))
    }
}
