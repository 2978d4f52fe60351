use std::path::PathBuf;

use thiserror::Error;

/// User-facing input failures. Each variant names the artifact at fault so
/// the CLI can report it on one line and stop before writing any output.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("{what} not found: {}", .path.display())]
    InputMissing { what: &'static str, path: PathBuf },

    #[error("no '{0}' column found in the SERP export")]
    MissingColumn(&'static str),

    #[error("client profile is empty: {}", .0.display())]
    ProfileEmpty(PathBuf),

    #[error(
        "client profile {} defines none of 'competitors', 'allies' or 'taboo'",
        .0.display()
    )]
    MissingProfileCategories(PathBuf),

    #[error("malformed {what}: {reason}")]
    Malformed { what: String, reason: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
