use std::{io, path::PathBuf};

use thiserror::Error;
use topo_exec::ExecError;
use topo_model::{GraphError, ModelError};

/// The submission cannot be configured.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required installation path is not configured: set STREAMS_INSTALL")]
    MissingInstall,

    #[error("toolkit root is not configured: set STREAMSX_TOPOLOGY_TOOLKIT or pass it explicitly")]
    MissingToolkit,

    #[error("no toolkit root found above {}", start.display())]
    ToolkitNotFound { start: PathBuf },

    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    #[error("invalid runtime layout: {0}")]
    InvalidLayout(String),
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Serialization(#[from] GraphError),

    #[error(transparent)]
    Encode(#[from] ModelError),

    #[error("failed to write submission descriptor: {0}")]
    Descriptor(#[source] io::Error),

    #[error("launch failed: {0}")]
    Launch(#[from] ExecError),

    #[error("external runtime exited with code {code}")]
    Exit { code: i32 },

    #[error("external runtime was terminated by a signal")]
    Terminated,
}
