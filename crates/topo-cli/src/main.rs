//! `topo-submit`: submit a serialized topology graph to the external runtime.
//!
//! ```text
//! STREAMS_INSTALL=/opt/ibm/streams topo-submit STANDALONE graph.json
//! ```
//!
//! The process exits with the runtime's own exit code, or 1 when the
//! submission could not be carried out.
use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context;
use clap::Parser;
use serde_json::Value;
use tracing::{error, info};

use topo_observe::{LoggerConfig, LoggerError, LoggerFormat, LoggerLevel, LoggerTimeZone, init_logger};
use topo_submit::{ContextType, SubmitConfig, Submitter};

/// Log filter used when `--log-level` is not given.
const ENV_LOG: &str = "TOPO_LOG";

/// Submit a topology graph to the external runtime.
#[derive(Debug, Parser)]
#[command(name = "topo-submit", version)]
struct Cli {
    /// Submission context type (STANDALONE, DISTRIBUTED, BUNDLE, ...).
    #[arg(value_name = "CONTEXT_TYPE")]
    context: ContextType,

    /// JSON file holding the serialized graph, or `-` for stdin.
    #[arg(value_name = "GRAPH_JSON")]
    graph: PathBuf,

    /// Toolkit root; discovered from the executable location when omitted.
    #[arg(long, value_name = "DIR")]
    toolkit: Option<PathBuf>,

    /// Directory for the temporary descriptor file.
    #[arg(long, value_name = "DIR")]
    descriptor_dir: Option<PathBuf>,

    /// Keep the descriptor file after submission.
    #[arg(long)]
    keep_descriptor: bool,

    /// Log filter expression (defaults to $TOPO_LOG, then `info`).
    #[arg(long, value_name = "FILTER")]
    log_level: Option<LoggerLevel>,

    /// Log output format.
    #[arg(long, value_name = "FORMAT", default_value_t = LoggerFormat::Text)]
    log_format: LoggerFormat,

    /// Timestamp timezone for logs.
    #[arg(long, value_name = "TZ", default_value_t = LoggerTimeZone::Utc)]
    log_tz: LoggerTimeZone,

    /// Disable colored log output.
    #[arg(long)]
    no_color: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Before the runtime starts: local offset detection needs a single thread.
    if let Err(e) = logger_config(&cli).and_then(|cfg| init_logger(&cfg)) {
        eprintln!("topo-submit: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = submit_config(&cli)?;
    let graph = read_graph(&cli.graph)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let outcome = runtime.block_on(async {
        Submitter::new(&config)?.submit(&cli.context, &graph).await
    })?;

    info!(code = ?outcome.exit_code(), faults = outcome.faults().len(), "done");
    Ok(ExitCode::from(exit_byte(outcome.exit_code())))
}

fn logger_config(cli: &Cli) -> Result<LoggerConfig, LoggerError> {
    let level = match &cli.log_level {
        Some(level) => level.clone(),
        None => match std::env::var(ENV_LOG) {
            Ok(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => LoggerLevel::default(),
        },
    };

    Ok(LoggerConfig {
        format: cli.log_format,
        level,
        tz: cli.log_tz,
        use_color: !cli.no_color,
        ..Default::default()
    })
}

/// Environment first, then command-line overrides, then toolkit discovery.
fn submit_config(cli: &Cli) -> anyhow::Result<SubmitConfig> {
    let mut config = SubmitConfig::from_env()?;

    if let Some(toolkit) = &cli.toolkit {
        config = config.with_toolkit(toolkit);
    }
    if let Some(dir) = &cli.descriptor_dir {
        config.descriptor_dir = Some(dir.clone());
    }
    config.keep_descriptor |= cli.keep_descriptor;

    if config.toolkit.is_none() {
        let exe = std::env::current_exe().context("cannot locate the running executable")?;
        let start = exe.parent().unwrap_or(Path::new("/"));
        config = config.with_discovered_toolkit(start)?;
    }
    Ok(config)
}

fn read_graph(path: &Path) -> anyhow::Result<Value> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read graph from stdin")?;
        buf
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("failed to read graph from {}", path.display()))?
    };

    serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Process exit byte for the runtime's exit code.
///
/// Codes outside `1..=255` and signal terminations map to 1.
fn exit_byte(code: Option<i32>) -> u8 {
    match code {
        Some(0) => 0,
        Some(c) => u8::try_from(c).ok().filter(|b| *b != 0).unwrap_or(1),
        None => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positional_arguments() {
        let cli = Cli::try_parse_from(["topo-submit", "BUNDLE", "graph.json"]).unwrap();

        assert_eq!(cli.context, ContextType::Bundle);
        assert_eq!(cli.graph, PathBuf::from("graph.json"));
        assert_eq!(cli.log_format, LoggerFormat::Text);
        assert!(!cli.keep_descriptor);
        assert!(cli.toolkit.is_none());
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from([
            "topo-submit",
            "--toolkit",
            "/opt/tk",
            "--keep-descriptor",
            "--log-level",
            "topo_exec=trace,info",
            "--log-format",
            "json",
            "--log-tz",
            "local",
            "--no-color",
            "DISTRIBUTED",
            "-",
        ])
        .unwrap();

        assert_eq!(cli.context, ContextType::Distributed);
        assert_eq!(cli.toolkit, Some(PathBuf::from("/opt/tk")));
        assert!(cli.keep_descriptor);
        assert_eq!(cli.log_level.unwrap().as_str(), "topo_exec=trace,info");
        assert_eq!(cli.log_format, LoggerFormat::Json);
        assert_eq!(cli.log_tz, LoggerTimeZone::Local);
        assert!(cli.no_color);
    }

    #[test]
    fn unknown_context_type_is_passed_through() {
        let cli = Cli::try_parse_from(["topo-submit", "EMBEDDED", "g.json"]).unwrap();
        assert_eq!(cli.context.as_str(), "EMBEDDED");
    }

    #[test]
    fn rejects_bad_log_level_and_blank_context() {
        assert!(Cli::try_parse_from(["topo-submit", "--log-level", "x=loud", "BUNDLE", "g.json"]).is_err());
        assert!(Cli::try_parse_from(["topo-submit", " ", "g.json"]).is_err());
        assert!(Cli::try_parse_from(["topo-submit", "BUNDLE"]).is_err());
    }

    #[test]
    fn exit_byte_mirrors_runtime() {
        assert_eq!(exit_byte(Some(0)), 0);
        assert_eq!(exit_byte(Some(3)), 3);
        assert_eq!(exit_byte(Some(255)), 255);
        assert_eq!(exit_byte(Some(256)), 1);
        assert_eq!(exit_byte(Some(-1)), 1);
        assert_eq!(exit_byte(None), 1);
    }

    #[test]
    fn read_graph_parses_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        fs::write(&path, r#"{"name": "app"}"#).unwrap();

        let graph = read_graph(&path).unwrap();
        assert_eq!(graph["name"], "app");

        fs::write(&path, "{not json").unwrap();
        assert!(read_graph(&path).is_err());
    }
}
