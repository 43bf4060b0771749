//! Typed errors for the collaborators at the edge of the app: the remote seed
//! source and the export/print handlers. Everything above them works with
//! `anyhow`, the same as the rest of the binary.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while fetching or decoding the seed roster.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The request never produced a response (DNS, TLS, connection, timeout).
    #[error("seed request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("seed source answered with HTTP {status}")]
    Status { status: u16 },

    /// The body was not the expected array of users.
    #[error("seed payload could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    /// The background loader went away without reporting.
    #[error("seed loader stopped before reporting a result")]
    Disconnected,
}

/// Failures while producing a PDF or handing a document to the system.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to render PDF: {0}")]
    Pdf(String),

    /// No handler could open the document (the terminal equivalent of a
    /// blocked popup).
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ExportError::Io {
            path: path.into(),
            source,
        }
    }
}
