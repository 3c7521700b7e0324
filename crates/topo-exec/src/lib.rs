//! Launching the external runtime.
//!
//! [`RuntimeLayout`] knows where the runtime and its libraries live and turns
//! a context type plus descriptor path into a [`LaunchCommand`].
//! [`Launcher`] spawns that command, echoes both output streams through a
//! [`LineSink`] and returns a [`LaunchOutcome`] once the process has exited
//! and both streams are drained.
mod error;
pub use error::ExecError;

mod layout;
pub use layout::RuntimeLayout;
pub use layout::discover_toolkit_root;
pub use layout::{CLASSPATH_FLAG, CLASSPATH_SEPARATOR, ENTRY_POINT};
pub use layout::{INSTALL_LIBRARY, JAVA_BINARY, TOOLKIT_LIBRARY};

mod sink;
pub use sink::{CollectSink, ConsoleSink, LineSink, StreamKind};

pub mod subprocess;
pub use subprocess::{
    DEFAULT_DRAIN_GRACE, FaultKind, LaunchCommand, LaunchOutcome, Launcher, StreamFault,
};
