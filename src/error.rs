//! Error types for gobi
//!
//! All modules use `GobiResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for gobi operations
pub type GobiResult<T> = Result<T, GobiError>;

/// All errors that can occur in gobi
#[derive(Error, Debug)]
pub enum GobiError {
    // Toolchain errors
    #[error("Go toolchain not found: {binary}")]
    GoNotFound { binary: String },

    #[error("go {args} failed{}", exit_suffix(.code))]
    GoCommand { args: String, code: Option<i32> },

    #[error("Unexpected output from go {args}: {reason}")]
    GoOutput { args: String, reason: String },

    #[error("go.mod not found in {0} or any parent directory")]
    GoModNotFound(PathBuf),

    #[error("No module directive in {0}")]
    ModuleDirectiveMissing(PathBuf),

    #[error("Package name is missing")]
    PackageNameMissing,

    #[error("Couldn't find suitable package files: {0}")]
    PackageFiles(PathBuf),

    // Build errors
    #[error("Build name and build number must be provided in order to {action}")]
    BuildNotConfigured { action: &'static str },

    #[error("Could not find zip binary for dependency '{name}' at {path}: {source}")]
    ArchiveLookup {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No build-info recorded for {name}/{number}")]
    BuildNotFound { name: String, number: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("{0}")]
    User(String),
}

fn exit_suffix(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!(" with exit code {}", code),
        None => " (terminated by signal)".to_string(),
    }
}

impl GobiError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Exit code to propagate from the process, if the error came from `go`
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::GoCommand { code, .. } => *code,
            _ => None,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::GoNotFound { .. } => Some("Install Go or run: gobi config set go.binary <path>"),
            Self::GoModNotFound(_) => Some("Run from a Go module or pass --path"),
            Self::BuildNotConfigured { .. } => {
                Some("Pass --build-name and --build-number, or set GOBI_BUILD_NAME/GOBI_BUILD_NUMBER")
            }
            Self::PackageNameMissing => Some("Usage: gobi go -- get <package>[@version]"),
            _ => None,
        }
    }
}
