use std::{io, path::PathBuf};

use thiserror::Error;

use crate::StreamKind;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("invalid runtime layout: {0}")]
    InvalidLayout(String),

    #[error("invalid launch command: {0}")]
    InvalidCommand(String),

    #[error("failed to start {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{0} of the external runtime was not captured")]
    MissingPipe(StreamKind),

    #[error("failed waiting for the external runtime: {0}")]
    Wait(#[source] io::Error),
}
