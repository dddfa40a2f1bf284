//! Pure IR construction helpers.
//!
//! Everything here is total and non-mutating: callers pass a reference and
//! receive a new `AppIr` value.

use std::collections::HashMap;

use super::AppIr;
use crate::diagnostic::Diagnostic;

/// Returns a new IR in which every named schema referenced from a route
/// slot is assigned that route's owning module.
///
/// When the same schema is referenced from routes of different modules the
/// last reference in module/router/route order wins.
pub fn enrich_schema_module_names(ir: &AppIr) -> AppIr {
    let mut owners: HashMap<String, String> = HashMap::new();
    for (module, _, route) in ir.routes() {
        for slot in route.schema_slots() {
            if let Some(name) = slot.as_ref().and_then(|r| r.name()) {
                owners.insert(name.to_string(), module.name.clone());
            }
        }
    }

    let mut out = ir.clone();
    for schema in &mut out.schemas {
        if let Some(module_name) = owners.get(&schema.name) {
            schema.module_name = Some(module_name.clone());
        }
    }
    out
}

/// Returns a new IR with `diagnostics` appended after the existing ones.
pub fn append_diagnostics(ir: &AppIr, diagnostics: &[Diagnostic]) -> AppIr {
    let mut out = ir.clone();
    out.diagnostics.extend_from_slice(diagnostics);
    out
}
