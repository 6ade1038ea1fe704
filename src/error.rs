use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::registrar::RegistrarError;
use crate::search::SearchError;

/// Crate-level error for everything outside the HTTP handlers.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Need at least 2 locations to animate pings, found {0}")]
    TooFewLocations(usize),

    #[error(transparent)]
    Registrar(#[from] RegistrarError),

    #[error(transparent)]
    Search(#[from] SearchError),
}

pub type Result<T> = std::result::Result<T, Error>;
