use std::path::{Path, PathBuf};

use topo_exec::{LaunchOutcome, StreamFault};
use topo_model::ContextType;

use crate::SubmitError;

/// What happened to a submission that reached the external runtime.
///
/// A non-zero exit is data here, not an error; use
/// [`SubmissionOutcome::into_result`] to treat it as one.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    context: ContextType,
    launch: LaunchOutcome,
    kept_descriptor: Option<PathBuf>,
}

impl SubmissionOutcome {
    pub(crate) fn new(
        context: ContextType,
        launch: LaunchOutcome,
        kept_descriptor: Option<PathBuf>,
    ) -> Self {
        Self {
            context,
            launch,
            kept_descriptor,
        }
    }

    pub fn context(&self) -> &ContextType {
        &self.context
    }

    /// Exit code of the runtime; `None` if it was killed by a signal.
    pub fn exit_code(&self) -> Option<i32> {
        self.launch.code()
    }

    pub fn success(&self) -> bool {
        self.launch.success()
    }

    /// Non-fatal output read failures.
    pub fn faults(&self) -> &[StreamFault] {
        self.launch.faults()
    }

    pub fn launch(&self) -> &LaunchOutcome {
        &self.launch
    }

    /// Descriptor left on disk, when keeping was requested.
    pub fn kept_descriptor(&self) -> Option<&Path> {
        self.kept_descriptor.as_deref()
    }

    /// `Ok(self)` on exit code 0, otherwise [`SubmitError::Exit`] or
    /// [`SubmitError::Terminated`].
    pub fn into_result(self) -> Result<Self, SubmitError> {
        if self.success() {
            return Ok(self);
        }
        match self.exit_code() {
            Some(code) => Err(SubmitError::Exit { code }),
            None => Err(SubmitError::Terminated),
        }
    }
}
