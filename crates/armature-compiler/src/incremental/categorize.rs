//! File-change batch categorization.
//!
//! Each changed path is classified into at most one category via
//! filename-suffix and path-substring rules, first match wins. Environment
//! and configuration files are checked last: their suffixes are generic
//! enough that any framework-role match must take precedence.

use std::path::{Path, PathBuf};

use crate::convention::{
    is_config_file, is_env_file, is_under_schemas_dir, MIDDLEWARE_FILE_SUFFIX, MODULE_FILE_SUFFIX,
    ROUTER_FILE_SUFFIX, SCHEMA_FILE_SUFFIX, SERVICE_FILE_SUFFIX,
};

/// What happened to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
}

/// A single entry of a change batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl FileChange {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// The role a changed file plays in the source tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    Schema,
    Router,
    Service,
    Module,
    Middleware,
    AppEntry,
    Env,
    Config,
    Unclassified,
}

/// Why a change batch demands a process reboot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebootReason {
    Env,
    Config,
}

impl RebootReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RebootReason::Env => "env",
            RebootReason::Config => "config",
        }
    }
}

/// A categorized change batch.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    pub schema_changes: Vec<FileChange>,
    pub router_changes: Vec<FileChange>,
    pub service_changes: Vec<FileChange>,
    pub module_changes: Vec<FileChange>,
    pub middleware_changes: Vec<FileChange>,

    /// Set when the app entry file changed.
    pub requires_full_recompile: bool,

    /// Set when an env or config file changed. Dominates everything else.
    pub requires_reboot: bool,

    /// Present iff `requires_reboot`. Config overwrites env when a batch
    /// contains both.
    pub reboot_reason: Option<RebootReason>,
}

/// Classifies a single path. `entry_file` is the only configuration value
/// the categorizer reads.
pub fn categorize_path(path: &Path, entry_file: &Path) -> FileCategory {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    if file_name.ends_with(SCHEMA_FILE_SUFFIX) || is_under_schemas_dir(path) {
        FileCategory::Schema
    } else if file_name.ends_with(ROUTER_FILE_SUFFIX) {
        FileCategory::Router
    } else if file_name.ends_with(SERVICE_FILE_SUFFIX) {
        FileCategory::Service
    } else if file_name.ends_with(MODULE_FILE_SUFFIX) {
        FileCategory::Module
    } else if file_name.ends_with(MIDDLEWARE_FILE_SUFFIX) {
        FileCategory::Middleware
    } else if path.ends_with(entry_file) {
        FileCategory::AppEntry
    } else if is_env_file(&file_name) {
        FileCategory::Env
    } else if is_config_file(&file_name) {
        FileCategory::Config
    } else {
        FileCategory::Unclassified
    }
}

/// Folds a change batch into a categorized `ChangeSet`.
pub fn categorize_changes(changes: &[FileChange], entry_file: &Path) -> ChangeSet {
    let mut set = ChangeSet::default();
    for change in changes {
        match categorize_path(&change.path, entry_file) {
            FileCategory::Schema => set.schema_changes.push(change.clone()),
            FileCategory::Router => set.router_changes.push(change.clone()),
            FileCategory::Service => set.service_changes.push(change.clone()),
            FileCategory::Module => set.module_changes.push(change.clone()),
            FileCategory::Middleware => set.middleware_changes.push(change.clone()),
            FileCategory::AppEntry => set.requires_full_recompile = true,
            FileCategory::Env => {
                set.requires_reboot = true;
                if set.reboot_reason != Some(RebootReason::Config) {
                    set.reboot_reason = Some(RebootReason::Env);
                }
            }
            FileCategory::Config => {
                set.requires_reboot = true;
                set.reboot_reason = Some(RebootReason::Config);
            }
            FileCategory::Unclassified => {}
        }
    }
    set
}
