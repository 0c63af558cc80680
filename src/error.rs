//! Error handling for scaffold-maker.
//! Defines the error type and result alias used throughout the generator.

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while configuring or generating a service skeleton.
///
/// Configuration errors are reported and end the run cleanly, render errors
/// abort the affected file only, filesystem errors abort the whole run.
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem operation failed
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Template compilation or rendering failed inside minijinja
    #[error("Template error: {0}.")]
    MinijinjaError(#[from] minijinja::Error),

    /// Template data could not be serialized
    #[error("Serialization error: {0}.")]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// A service or module name does not satisfy the naming rules
    #[error("Validation error: {0}.")]
    ValidationError(String),

    #[error("Service '{service}' does not exist in '{output_dir}'.")]
    ServiceNotFoundError { service: String, output_dir: String },

    #[error("Module '{module}' does not exist in service '{service}'.")]
    ModuleNotFoundError { module: String, service: String },

    /// A single file could not be rendered; carries the offending path
    #[error("Failed to render '{path}': {reason}.")]
    RenderError { path: String, reason: String },

    #[error("Generation finished with {failed} file(s) that could not be rendered.")]
    IncompleteGenerationError { failed: usize },

    #[error("Generation did not finish within {0:?}.")]
    TimeoutError(Duration),
}

/// Convenience type alias for Results with [`Error`] as the error type.
///
/// # Type Parameters
/// * `T` - The type of the success value
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to report
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) -> ! {
    eprintln!("{err}");
    std::process::exit(1);
}
