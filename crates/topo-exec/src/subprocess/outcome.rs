use std::{fmt, process::ExitStatus};

use crate::StreamKind;

/// What went wrong while reading one of the runtime's output streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultKind {
    /// A line was not valid UTF-8; it was skipped and reading continued.
    Decode { line: u64 },
    /// Reading the pipe failed; the reader stopped.
    Read,
    /// The reader was stopped while the stream was still open, or its task
    /// panicked.
    Aborted,
}

/// Non-fatal failure of a stream reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFault {
    pub stream: StreamKind,
    pub kind: FaultKind,
    pub message: String,
}

impl StreamFault {
    pub(crate) fn new(stream: StreamKind, kind: FaultKind, message: impl fmt::Display) -> Self {
        Self {
            stream,
            kind,
            message: message.to_string(),
        }
    }
}

impl fmt::Display for StreamFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FaultKind::Decode { line } => {
                write!(f, "{} line {line} is not valid UTF-8: {}", self.stream, self.message)
            }
            FaultKind::Read => write!(f, "reading {} failed: {}", self.stream, self.message),
            FaultKind::Aborted => write!(f, "{} reader aborted: {}", self.stream, self.message),
        }
    }
}

/// Result of running the external runtime to completion.
///
/// Produced only after the process has exited and both readers have
/// finished, so every echoed line has already reached the sink.
#[derive(Debug, Clone)]
pub struct LaunchOutcome {
    status: ExitStatus,
    stdout_lines: u64,
    stderr_lines: u64,
    faults: Vec<StreamFault>,
}

impl LaunchOutcome {
    pub fn new(
        status: ExitStatus,
        stdout_lines: u64,
        stderr_lines: u64,
        faults: Vec<StreamFault>,
    ) -> Self {
        Self {
            status,
            stdout_lines,
            stderr_lines,
            faults,
        }
    }

    pub fn status(&self) -> ExitStatus {
        self.status
    }

    /// Exit code, or `None` when the process was killed by a signal.
    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }

    /// `true` when the process exited with code 0.
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Number of lines delivered to the sink for `stream`.
    pub fn lines(&self, stream: StreamKind) -> u64 {
        match stream {
            StreamKind::Stdout => self.stdout_lines,
            StreamKind::Stderr => self.stderr_lines,
        }
    }

    pub fn faults(&self) -> &[StreamFault] {
        &self.faults
    }

    pub fn has_faults(&self) -> bool {
        !self.faults.is_empty()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::os::unix::process::ExitStatusExt;

    use super::*;

    #[test]
    fn exit_code_is_surfaced() {
        let ok = LaunchOutcome::new(ExitStatus::from_raw(0), 3, 1, Vec::new());
        assert!(ok.success());
        assert_eq!(ok.code(), Some(0));
        assert_eq!(ok.lines(StreamKind::Stdout), 3);
        assert_eq!(ok.lines(StreamKind::Stderr), 1);
        assert!(!ok.has_faults());

        let failed = LaunchOutcome::new(ExitStatus::from_raw(2 << 8), 0, 0, Vec::new());
        assert!(!failed.success());
        assert_eq!(failed.code(), Some(2));
    }

    #[test]
    fn signal_has_no_code() {
        // SIGKILL
        let killed = LaunchOutcome::new(ExitStatus::from_raw(9), 0, 0, Vec::new());
        assert!(!killed.success());
        assert_eq!(killed.code(), None);
    }

    #[test]
    fn fault_display() {
        let fault = StreamFault::new(
            StreamKind::Stderr,
            FaultKind::Decode { line: 7 },
            "invalid utf-8 sequence of 1 bytes from index 0",
        );
        assert_eq!(
            fault.to_string(),
            "stderr line 7 is not valid UTF-8: invalid utf-8 sequence of 1 bytes from index 0"
        );
    }
}
