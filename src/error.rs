use miette::Diagnostic;
use thiserror::Error;

/// Main error type for kiln operations.
///
/// Reserved for the fatal tier: I/O failures, corrupt input documents,
/// duplicate identifiers, atomic-write failures. Expected domain failures
/// (bad dimensions, missing layers) travel as structured values instead.
#[derive(Error, Diagnostic, Debug)]
pub enum KilnError {
    #[error("IO error: {0}")]
    #[diagnostic(code(kiln::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {}: {message}", .path.display())]
    #[diagnostic(code(kiln::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error in {}: {message}", .path.display())]
    #[diagnostic(code(kiln::parse))]
    Parse {
        path: std::path::PathBuf,
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Duplicate id '{id}': first declared by {}, redeclared by {}", .first.display(), .second.display())]
    #[diagnostic(
        code(kiln::duplicate_id),
        help("Identifiers must be unique; rename one of the sources")
    )]
    DuplicateId {
        id: String,
        first: std::path::PathBuf,
        second: std::path::PathBuf,
    },

    #[error("Validation error: {message}")]
    #[diagnostic(code(kiln::validate))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Compile error: {message}")]
    #[diagnostic(code(kiln::compile))]
    Compile {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Build error: {message}")]
    #[diagnostic(code(kiln::build))]
    Build {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, KilnError>;
