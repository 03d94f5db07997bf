//! Error types for content loading and site export.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to load or validate a portfolio content file.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("cannot read content file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse content file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    #[error("invalid content: {field}: {reason}")]
    Invalid { field: String, reason: String },
}

impl ContentError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Failure while writing the static site.
#[derive(Error, Debug)]
pub enum SiteError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("I/O error while {operation} {}: {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot serialize content: {0}")]
    Json(#[from] serde_json::Error),
}

impl SiteError {
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

impl From<ContentError> for io::Error {
    fn from(e: ContentError) -> Self {
        let kind = match &e {
            ContentError::Read { source, .. } => source.kind(),
            _ => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, e)
    }
}

impl From<SiteError> for io::Error {
    fn from(e: SiteError) -> Self {
        match e {
            SiteError::Content(c) => c.into(),
            other => io::Error::new(io::ErrorKind::Other, other),
        }
    }
}
