mod config;
mod error;
mod install;
mod object;

pub use config::LoggerConfig;
pub use error::{LoggerError, LoggerResult};
pub use object::{LoggerFormat, LoggerLevel, LoggerTimeZone};

/// Installs the global tracing subscriber described by `cfg`.
///
/// Must be called once, early in `main()`. When `cfg.tz` is
/// [`LoggerTimeZone::Local`] the offset is detected here, so call it before
/// starting a multi-threaded runtime.
///
/// # Examples
/// ```rust
/// use topo_observe::{LoggerConfig, init_logger};
///
/// init_logger(&LoggerConfig::default()).expect("logger must install once");
/// tracing::info!("ready");
/// ```
pub fn init_logger(cfg: &LoggerConfig) -> LoggerResult<()> {
    match cfg.format {
        LoggerFormat::Text => install::text(cfg),
        LoggerFormat::Json => install::json(cfg),
        LoggerFormat::Journald => install::journald(cfg),
    }
}
