use std::path::PathBuf;
use thiserror::Error;

use crate::location::ModuleLocation;

/// Fatal errors raised by the engine.
///
/// Problems with the modules themselves never show up here; they are
/// recorded as [`Finding`](crate::Finding)s instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Resolution engine has no module loader configured")]
    NoModuleLoader,

    #[error("Root module at {location} is unreadable: {source}")]
    RootUnreadable {
        location: ModuleLocation,
        #[source]
        source: crate::contracts::LoadError,
    },

    #[error("Input {path} cannot be used as a module location")]
    InvalidInput { path: PathBuf },

    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read catalog at {path}: {source}")]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog at {path}: {source}")]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Other(String),
}

impl Error {
    #[must_use]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
