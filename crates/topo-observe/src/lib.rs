//! Logging setup shared by the submission tools.
//!
//! Everything is written to stderr so the pass-through of the external
//! runtime's stdout stays clean.
mod logger;
pub use logger::*;
