//! Source-tree file naming conventions.
//!
//! The framework is convention-based: the role of a source file is encoded
//! in its filename suffix or its directory. Both the change categorizer and
//! the placement validator read these rules from here.

use std::path::Path;

pub const SCHEMA_FILE_SUFFIX: &str = ".schemas.ts";
pub const ROUTER_FILE_SUFFIX: &str = ".router.ts";
pub const SERVICE_FILE_SUFFIX: &str = ".service.ts";
pub const MODULE_FILE_SUFFIX: &str = ".module.ts";
pub const MIDDLEWARE_FILE_SUFFIX: &str = ".middleware.ts";

/// Directory name under which schema files are expected to live.
pub const SCHEMAS_DIR_NAME: &str = "schemas";

/// True if any path component is the `schemas` directory.
pub fn is_under_schemas_dir(path: &Path) -> bool {
    path.components()
        .any(|c| c.as_os_str() == SCHEMAS_DIR_NAME)
}

/// True for environment definition files (`.env`, `.env.local`, ...).
pub fn is_env_file(file_name: &str) -> bool {
    file_name.starts_with(".env")
}

/// True for framework configuration files (`armature.config.ts`,
/// `app.config.json`, ...).
pub fn is_config_file(file_name: &str) -> bool {
    file_name.contains("config")
}
