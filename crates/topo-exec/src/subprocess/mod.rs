//! Spawning the external runtime and draining its output.
mod command;
pub use command::LaunchCommand;

mod outcome;
pub use outcome::{FaultKind, LaunchOutcome, StreamFault};

mod pump;

mod launcher;
pub use launcher::{DEFAULT_DRAIN_GRACE, Launcher};
