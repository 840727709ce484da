//! Engine error type.
//!
//! Only conditions that abort a table step are errors. Malformed cells are
//! used verbatim and ambiguous inferences are skipped; neither reaches here.

use std::path::PathBuf;

/// Errors raised while translating tables into axioms.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A table file named by a build step does not exist.
    #[error("table file not found: {}", .0.display())]
    TableNotFound(PathBuf),

    /// A `[Continued in Table N]` reference matched no file in the source directory.
    #[error("file related to {reference} not found in {}", .dir.display())]
    JumpTargetNotFound {
        /// Normalized `Table N` reference.
        reference: String,
        /// Directory that was searched.
        dir: PathBuf,
    },

    /// Reading a table or plan failed.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The table ended before its header line.
    #[error("{} has no header line", .0.display())]
    MissingHeader(PathBuf),

    /// A column the step cannot work without is absent from the header.
    #[error("{} has no {column} column", .path.display())]
    MissingColumn {
        /// Name of the missing column role.
        column: &'static str,
        /// Table file.
        path: PathBuf,
    },

    /// The build plan is syntactically valid TOML but semantically invalid.
    #[error("invalid build plan: {0}")]
    Plan(String),

    /// The build plan is not valid TOML or does not match the plan schema.
    #[error("failed to parse build plan: {0}")]
    PlanSyntax(#[from] toml::de::Error),

    /// A cell pattern failed to compile.
    #[error("invalid cell pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl Error {
    /// Wraps an I/O error with the path it concerns.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Engine result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;
