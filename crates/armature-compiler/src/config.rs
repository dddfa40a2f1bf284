//! Compiler configuration.
//!
//! Loading and merging of configuration files belongs to the CLI; the
//! compiler only consumes the resolved values.

use std::path::PathBuf;

/// Resolved configuration for the Armature compiler.
#[derive(Debug, Clone)]
pub struct CompilerConfig {
    /// Directory containing application source files.
    pub source_dir: PathBuf,

    /// Directory generators write artifacts into.
    pub output_dir: PathBuf,

    /// The application entry file, relative to `source_dir`.
    /// A change batch touching this file forces a full recompile.
    pub entry_file: PathBuf,

    /// Treat warnings as errors when gating generation.
    pub strict: bool,

    /// Generate artifacts even when error diagnostics are present.
    pub force_generate: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("src"),
            output_dir: PathBuf::from("generated"),
            entry_file: PathBuf::from("app.ts"),
            strict: false,
            force_generate: false,
        }
    }
}
