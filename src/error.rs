use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AltError {
    #[error("not linking {link} to {target} since {link} exists and is not a link")]
    ForeignObject { link: String, target: String },

    #[error("no alternatives registered for '{0}'")]
    NotRegistered(String),

    #[error("invalid alternative name '{0}' (must be a single path component)")]
    InvalidName(String),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AltError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::ForeignObject { .. } => "foreign_object",
            Self::NotRegistered(_) => "not_registered",
            Self::InvalidName(_) => "invalid_name",
            Self::Io { .. } => "io_error",
            Self::Json(_) => "json_error",
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ForeignObject { .. } | Self::NotRegistered(_) => 1,
            Self::InvalidName(_) => 2,
            Self::Io { .. } | Self::Json(_) => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, AltError>;
