//! CLI error types

use std::path::PathBuf;

use prisma_gen_drizzle::GeneratorError;

/// Error type for the CLI
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Generation failed
    #[error(transparent)]
    Generate(#[from] GeneratorError),

    /// The datamodel file could not be read
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A generated file could not be written
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
