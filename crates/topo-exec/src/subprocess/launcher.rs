use std::{fmt, sync::Arc, time::Duration};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{
    ConsoleSink, ExecError, FaultKind, LaunchCommand, LaunchOutcome, LineSink, StreamFault,
    StreamKind,
    subprocess::pump::{PumpReport, pump},
};

/// How long output may keep flowing after the runtime has exited.
pub const DEFAULT_DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Runs the external runtime and echoes its output.
///
/// Each launch spawns one child process and two reader tasks (stdout and
/// stderr). `launch` returns only after the child has exited and both
/// readers have finished, so no line is still in flight when it returns.
///
/// A process started by the runtime may inherit its pipes and hold them
/// open. Readers still running [`DEFAULT_DRAIN_GRACE`] after the runtime
/// exits are stopped and reported as [`FaultKind::Aborted`].
#[derive(Clone)]
pub struct Launcher {
    sink: Arc<dyn LineSink>,
    drain_grace: Duration,
}

impl Launcher {
    pub fn new(sink: Arc<dyn LineSink>) -> Self {
        Self {
            sink,
            drain_grace: DEFAULT_DRAIN_GRACE,
        }
    }

    /// Override how long readers may run after the runtime exits.
    pub fn with_drain_grace(mut self, grace: Duration) -> Self {
        self.drain_grace = grace;
        self
    }

    /// Launcher echoing to the local console.
    pub fn console() -> Self {
        Self::new(Arc::new(ConsoleSink))
    }

    /// Spawn `cmd`, drain both streams and wait for exit.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// Errors:
    /// - [`ExecError::InvalidCommand`] if the command does not validate;
    /// - [`ExecError::Spawn`] if the process cannot be started;
    /// - [`ExecError::Wait`] if waiting on the process fails.
    ///
    /// A non-zero exit is not an error: the status is in the outcome along
    /// with any stream faults.
    pub async fn launch(&self, cmd: &LaunchCommand) -> Result<LaunchOutcome, ExecError> {
        cmd.validate()?;

        let mut child = cmd.to_command().spawn().map_err(|source| ExecError::Spawn {
            program: cmd.program().to_path_buf(),
            source,
        })?;
        debug!(pid = ?child.id(), program = %cmd.program().display(), "external runtime started");

        let stdout = child
            .stdout
            .take()
            .ok_or(ExecError::MissingPipe(StreamKind::Stdout))?;
        let stderr = child
            .stderr
            .take()
            .ok_or(ExecError::MissingPipe(StreamKind::Stderr))?;

        let (stop_tx, stop_rx) = watch::channel(false);
        let out_task = tokio::spawn(pump(
            stdout,
            StreamKind::Stdout,
            self.sink.clone(),
            stop_rx.clone(),
        ));
        let err_task = tokio::spawn(pump(stderr, StreamKind::Stderr, self.sink.clone(), stop_rx));

        let status = match child.wait().await {
            Ok(status) => status,
            Err(e) => {
                out_task.abort();
                err_task.abort();
                return Err(ExecError::Wait(e));
            }
        };
        debug!(?status, "external runtime exited");

        let drain = async { tokio::join!(out_task, err_task) };
        tokio::pin!(drain);
        let (out, err) = tokio::select! {
            res = &mut drain => res,
            _ = tokio::time::sleep(self.drain_grace) => {
                warn!(grace = ?self.drain_grace, "output still open after the external runtime exited");
                let _ = stop_tx.send(true);
                drain.await
            }
        };
        let out = joined(StreamKind::Stdout, out);
        let err = joined(StreamKind::Stderr, err);

        let mut faults = out.faults;
        faults.extend(err.faults);

        Ok(LaunchOutcome::new(status, out.lines, err.lines, faults))
    }
}

impl Default for Launcher {
    fn default() -> Self {
        Self::console()
    }
}

impl fmt::Debug for Launcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Launcher")
            .field("sink", &"<sink>")
            .field("drain_grace", &self.drain_grace)
            .finish()
    }
}

/// Turn a reader task result into a report; a panicked reader becomes a fault.
fn joined(stream: StreamKind, res: Result<PumpReport, tokio::task::JoinError>) -> PumpReport {
    match res {
        Ok(report) => report,
        Err(e) => {
            warn!(%stream, "output reader did not complete: {e}");
            PumpReport {
                lines: 0,
                faults: vec![StreamFault::new(stream, FaultKind::Aborted, e)],
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::CollectSink;

    fn sh(script: &str) -> LaunchCommand {
        LaunchCommand::new("/bin/sh").arg("-c").arg(script)
    }

    #[tokio::test]
    async fn echoes_both_streams_and_reports_exit_code() {
        let sink = Arc::new(CollectSink::new());
        let launcher = Launcher::new(sink.clone());

        let outcome = launcher
            .launch(&sh("echo one; echo two; echo oops >&2; exit 4"))
            .await
            .unwrap();

        assert_eq!(outcome.code(), Some(4));
        assert!(!outcome.success());
        assert_eq!(sink.lines(StreamKind::Stdout), vec!["one", "two"]);
        assert_eq!(sink.lines(StreamKind::Stderr), vec!["oops"]);
        assert_eq!(outcome.lines(StreamKind::Stdout), 2);
        assert_eq!(outcome.lines(StreamKind::Stderr), 1);
        assert!(!outcome.has_faults());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn large_output_on_both_streams_does_not_deadlock() {
        let sink = Arc::new(CollectSink::new());
        let launcher = Launcher::new(sink.clone());

        // Well past a pipe buffer on each stream.
        let script = "i=0; while [ $i -lt 5000 ]; do \
                      echo \"out $i\"; echo \"err $i\" >&2; i=$((i+1)); done";
        let outcome = launcher.launch(&sh(script)).await.unwrap();

        assert!(outcome.success());
        let out = sink.lines(StreamKind::Stdout);
        let err = sink.lines(StreamKind::Stderr);
        assert_eq!(out.len(), 5000);
        assert_eq!(err.len(), 5000);
        assert_eq!(out[4999], "out 4999");
        assert_eq!(err[0], "err 0");
    }

    #[tokio::test]
    async fn stdin_is_not_connected() {
        let sink = Arc::new(CollectSink::new());
        let launcher = Launcher::new(sink.clone());

        let outcome = launcher
            .launch(&sh("if read line; then echo got; else echo eof; fi"))
            .await
            .unwrap();

        assert!(outcome.success());
        assert_eq!(sink.lines(StreamKind::Stdout), vec!["eof"]);
    }

    #[tokio::test]
    async fn extra_env_reaches_the_child() {
        let sink = Arc::new(CollectSink::new());
        let launcher = Launcher::new(sink.clone());

        let env = [("TOPO_TEST_VALUE", "42")].into_iter().collect();
        let cmd = sh("echo \"$TOPO_TEST_VALUE\"").with_env(env);
        launcher.launch(&cmd).await.unwrap();

        assert_eq!(sink.lines(StreamKind::Stdout), vec!["42"]);
    }

    #[tokio::test]
    async fn child_runs_in_the_parent_working_directory() {
        let sink = Arc::new(CollectSink::new());
        let launcher = Launcher::new(sink.clone());

        launcher.launch(&sh("pwd -P")).await.unwrap();

        let expected = std::env::current_dir().unwrap().canonicalize().unwrap();
        let printed = sink.lines(StreamKind::Stdout);
        assert_eq!(printed.len(), 1);
        assert_eq!(std::path::PathBuf::from(&printed[0]), expected);
    }

    #[tokio::test]
    async fn undecodable_line_is_reported_not_fatal() {
        let sink = Arc::new(CollectSink::new());
        let launcher = Launcher::new(sink.clone());

        let outcome = launcher
            .launch(&sh("printf 'ok\\n\\377\\nstill here\\n'"))
            .await
            .unwrap();

        assert!(outcome.success());
        assert_eq!(sink.lines(StreamKind::Stdout), vec!["ok", "still here"]);
        assert_eq!(outcome.faults().len(), 1);
        assert_eq!(outcome.faults()[0].kind, FaultKind::Decode { line: 2 });
    }

    #[tokio::test]
    async fn inherited_pipes_do_not_outlive_the_drain_grace() {
        let sink = Arc::new(CollectSink::new());
        let launcher = Launcher::new(sink.clone()).with_drain_grace(Duration::from_millis(200));

        let started = std::time::Instant::now();
        let outcome = launcher
            .launch(&sh("echo started; sleep 5 & exit 0"))
            .await
            .unwrap();

        assert!(
            started.elapsed() < Duration::from_secs(3),
            "launch took {:?} after the runtime exited",
            started.elapsed()
        );
        assert!(outcome.success());
        assert_eq!(sink.lines(StreamKind::Stdout), vec!["started"]);
        assert_eq!(outcome.lines(StreamKind::Stdout), 1);
        assert!(
            outcome
                .faults()
                .iter()
                .any(|f| f.stream == StreamKind::Stdout && f.kind == FaultKind::Aborted)
        );
    }

    #[tokio::test]
    async fn closed_pipes_finish_without_faults_inside_the_grace() {
        let launcher =
            Launcher::new(Arc::new(CollectSink::new())).with_drain_grace(Duration::from_secs(30));

        let started = std::time::Instant::now();
        let outcome = launcher.launch(&sh("echo done")).await.unwrap();

        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(!outcome.has_faults());
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let launcher = Launcher::new(Arc::new(CollectSink::new()));
        let cmd = LaunchCommand::new("/nonexistent/java/jre/bin/java").arg("-version");

        let err = launcher.launch(&cmd).await.unwrap_err();
        match err {
            ExecError::Spawn { program, source } => {
                assert_eq!(program, std::path::PathBuf::from("/nonexistent/java/jre/bin/java"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected ExecError::Spawn, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_command_is_rejected_before_spawn() {
        let launcher = Launcher::new(Arc::new(CollectSink::new()));
        let err = launcher.launch(&LaunchCommand::new("")).await.unwrap_err();
        assert!(matches!(err, ExecError::InvalidCommand(_)));
    }
}
