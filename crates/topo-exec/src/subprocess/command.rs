use std::{
    ffi::{OsStr, OsString},
    fmt,
    path::{Path, PathBuf},
    process::Stdio,
};

use tokio::process::Command;
use topo_model::Env;
use tracing::trace;

use crate::ExecError;

/// Fully resolved command line for the external runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    /// Executable to run.
    program: PathBuf,
    /// Arguments, in order, excluding the program itself.
    args: Vec<OsString>,
    /// Extra variables on top of the inherited environment.
    env: Env,
}

impl LaunchCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Env::default(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Replace the extra environment.
    pub fn with_env(mut self, env: Env) -> Self {
        self.env = env;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    /// Program followed by its arguments, lossily converted to UTF-8.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .map(|s| s.to_string_lossy().into_owned())
            .collect()
    }

    /// Rules:
    /// - `program` is not empty or whitespace-only.
    pub fn validate(&self) -> Result<(), ExecError> {
        if self.program.to_string_lossy().trim().is_empty() {
            return Err(ExecError::InvalidCommand("program is empty".into()));
        }
        Ok(())
    }

    /// Process builder with stdin closed and both output streams piped.
    ///
    /// The child inherits the parent's working directory.
    pub(crate) fn to_command(&self) -> Command {
        trace!(
            program = %self.program.display(),
            args = ?self.args,
            env_len = self.env.len(),
            "preparing external runtime command",
        );

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .envs(self.env.iter())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl fmt::Display for LaunchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.argv().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_argument_order() {
        let cmd = LaunchCommand::new("/usr/bin/java")
            .arg("-classpath")
            .arg("a.jar:b.jar")
            .arg(Path::new("/tmp/x.json"));

        assert_eq!(
            cmd.argv(),
            vec!["/usr/bin/java", "-classpath", "a.jar:b.jar", "/tmp/x.json"]
        );
        assert_eq!(cmd.args().len(), 3);
    }

    #[test]
    fn display_joins_argv() {
        let cmd = LaunchCommand::new("java").arg("-version");
        assert_eq!(cmd.to_string(), "java -version");
    }

    #[test]
    fn validate_rejects_blank_program() {
        for program in ["", "   "] {
            let err = LaunchCommand::new(program).validate().unwrap_err();
            assert!(matches!(err, ExecError::InvalidCommand(_)));
        }
        assert!(LaunchCommand::new("java").validate().is_ok());
    }

    #[test]
    fn env_is_attached() {
        let env: Env = [("JAVA_OPTS", "-Xmx512m")].into_iter().collect();
        let cmd = LaunchCommand::new("java").with_env(env);
        assert_eq!(cmd.env().get("JAVA_OPTS"), Some("-Xmx512m"));
    }
}
