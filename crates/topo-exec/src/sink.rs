use std::{
    fmt,
    io::Write,
    sync::{Mutex, PoisonError},
};

/// One of the two output streams of the external runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamKind::Stdout => "stdout",
            StreamKind::Stderr => "stderr",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination for lines read from the external runtime.
///
/// Called concurrently from the stdout and stderr readers; within one stream
/// lines arrive in the order they were written.
pub trait LineSink: Send + Sync {
    fn emit(&self, stream: StreamKind, line: &str);
}

/// Echo lines to the local console: stdout to stdout, stderr to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl LineSink for ConsoleSink {
    fn emit(&self, stream: StreamKind, line: &str) {
        // A closed console (e.g. broken pipe) must not take the readers down.
        let _ = match stream {
            StreamKind::Stdout => writeln!(std::io::stdout().lock(), "{line}"),
            StreamKind::Stderr => writeln!(std::io::stderr().lock(), "{line}"),
        };
    }
}

/// Keeps every line in memory, tagged with its stream.
#[derive(Debug, Default)]
pub struct CollectSink {
    lines: Mutex<Vec<(StreamKind, String)>>,
}

impl CollectSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines received on `stream`, in arrival order.
    pub fn lines(&self, stream: StreamKind) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(s, _)| *s == stream)
            .map(|(_, line)| line.clone())
            .collect()
    }

    /// Every line received so far, across both streams.
    pub fn all(&self) -> Vec<(StreamKind, String)> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LineSink for CollectSink {
    fn emit(&self, stream: StreamKind, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((stream, line.to_string()));
    }
}
