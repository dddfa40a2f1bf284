//! Compiler fault types.
//!
//! These are collaborator faults, not structural findings: an analyzer that
//! cannot produce its fragment, a generator that cannot write, a type-check
//! session that cannot be spawned. They abort the in-progress pass.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors that abort a compilation pass.
#[derive(Error, Diagnostic, Debug)]
pub enum CompilerError {
    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("Failed to access '{path}': {message}")]
    #[diagnostic(code(armature::io::access_error))]
    IoError { path: PathBuf, message: String },

    // =========================================================================
    // Analysis Errors
    // =========================================================================
    #[error("Analyzer '{role}' failed: {message}")]
    #[diagnostic(
        code(armature::analyze::analyzer_failed),
        help("The source tree could not be analyzed. Fix the reported problem and recompile.")
    )]
    AnalyzerFailed { role: String, message: String },

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validator '{name}' failed: {message}")]
    #[diagnostic(code(armature::validate::validator_failed))]
    ValidatorFailed { name: String, message: String },

    // =========================================================================
    // Generation Errors
    // =========================================================================
    #[error("Generator '{name}' failed: {message}")]
    #[diagnostic(code(armature::generate::generator_failed))]
    GeneratorFailed { name: String, message: String },

    // =========================================================================
    // Type-check Errors
    // =========================================================================
    #[error("Failed to spawn type checker '{program}': {message}")]
    #[diagnostic(
        code(armature::typecheck::spawn_failed),
        help("Make sure the type checker is installed and on PATH.")
    )]
    TypecheckSpawn { program: String, message: String },

    #[error("Type checker output stream failed: {message}")]
    #[diagnostic(code(armature::typecheck::io_error))]
    TypecheckIo { message: String },
}

impl CompilerError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::IoError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an analyzer fault for the given role.
    pub fn analyzer(role: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AnalyzerFailed {
            role: role.into(),
            message: message.into(),
        }
    }

    /// Creates a generator fault.
    pub fn generator(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::GeneratorFailed {
            name: name.into(),
            message: message.into(),
        }
    }
}
