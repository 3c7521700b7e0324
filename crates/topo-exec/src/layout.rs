//! Filesystem layout of the external runtime.
//!
//! Two roots are involved:
//! - the installation root (`STREAMS_INSTALL`), which holds the Java runtime
//!   and the operator library;
//! - the toolkit root, which holds the topology library implementing the
//!   submission entry point.
//!
//! The command line built here is the wire contract with the runtime:
//!
//! ```text
//! <install>/java/jre/bin/java -classpath <toolkit-lib>:<install-lib> \
//!     com.ibm.streamsx.topology.context.StreamsContextSubmit <ctxtype> <descriptor>
//! ```
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use topo_model::ContextType;
use tracing::trace;

use crate::{ExecError, LaunchCommand};

/// Java executable, relative to the installation root.
pub const JAVA_BINARY: &[&str] = &["java", "jre", "bin", "java"];

/// Topology library, relative to the toolkit root.
pub const TOOLKIT_LIBRARY: &[&str] = &["lib", "com.ibm.streamsx.topology.jar"];

/// Operator library, relative to the installation root.
pub const INSTALL_LIBRARY: &[&str] = &["lib", "com.ibm.streams.operator.samples.jar"];

/// Main class that performs the submission inside the runtime.
pub const ENTRY_POINT: &str = "com.ibm.streamsx.topology.context.StreamsContextSubmit";

pub const CLASSPATH_FLAG: &str = "-classpath";

/// Fixed on every platform; the runtime only ships for Unix-like hosts.
pub const CLASSPATH_SEPARATOR: &str = ":";

/// Resolved installation and toolkit roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeLayout {
    install: PathBuf,
    toolkit: PathBuf,
}

impl RuntimeLayout {
    /// Both roots must be non-empty. Existence is not checked here: a missing
    /// runtime surfaces as a spawn failure.
    pub fn new(install: impl Into<PathBuf>, toolkit: impl Into<PathBuf>) -> Result<Self, ExecError> {
        let install = install.into();
        let toolkit = toolkit.into();

        if install.as_os_str().is_empty() {
            return Err(ExecError::InvalidLayout("installation root is empty".into()));
        }
        if toolkit.as_os_str().is_empty() {
            return Err(ExecError::InvalidLayout("toolkit root is empty".into()));
        }
        Ok(Self { install, toolkit })
    }

    pub fn install(&self) -> &Path {
        &self.install
    }

    pub fn toolkit(&self) -> &Path {
        &self.toolkit
    }

    pub fn java(&self) -> PathBuf {
        join_all(&self.install, JAVA_BINARY)
    }

    /// `<toolkit library>:<installation library>`
    pub fn classpath(&self) -> OsString {
        let mut cp = join_all(&self.toolkit, TOOLKIT_LIBRARY).into_os_string();
        cp.push(CLASSPATH_SEPARATOR);
        cp.push(join_all(&self.install, INSTALL_LIBRARY));
        cp
    }

    /// Build the submission command for `ctx` reading `descriptor`.
    pub fn command(&self, ctx: &ContextType, descriptor: &Path) -> LaunchCommand {
        let cmd = LaunchCommand::new(self.java())
            .arg(CLASSPATH_FLAG)
            .arg(self.classpath())
            .arg(ENTRY_POINT)
            .arg(ctx.as_str())
            .arg(descriptor);

        trace!(%cmd, "submission command built");
        cmd
    }
}

/// Find the toolkit root by walking up from `start`.
///
/// Returns the first directory among `start` and its ancestors that contains
/// the topology library (`lib/com.ibm.streamsx.topology.jar`).
pub fn discover_toolkit_root(start: &Path) -> Option<PathBuf> {
    let found = start
        .ancestors()
        .find(|dir| join_all(dir, TOOLKIT_LIBRARY).is_file())
        .map(Path::to_path_buf);

    trace!(start = %start.display(), found = ?found, "toolkit discovery");
    found
}

fn join_all(root: &Path, parts: &[&str]) -> PathBuf {
    let mut path = root.to_path_buf();
    path.extend(parts);
    path
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn layout() -> RuntimeLayout {
        RuntimeLayout::new("/opt/ibm/streams", "/opt/toolkits/topology").unwrap()
    }

    #[test]
    fn java_lives_under_install() {
        assert_eq!(layout().java(), PathBuf::from("/opt/ibm/streams/java/jre/bin/java"));
    }

    #[test]
    fn classpath_joins_both_libraries() {
        assert_eq!(
            layout().classpath(),
            OsString::from(
                "/opt/toolkits/topology/lib/com.ibm.streamsx.topology.jar:\
                 /opt/ibm/streams/lib/com.ibm.streams.operator.samples.jar"
            )
        );
    }

    #[test]
    fn command_matches_wire_contract() {
        let cmd = layout().command(
            &ContextType::Standalone,
            Path::new("/tmp/splpytmp1234.json"),
        );

        assert_eq!(cmd.program(), Path::new("/opt/ibm/streams/java/jre/bin/java"));
        assert_eq!(
            cmd.argv(),
            vec![
                "/opt/ibm/streams/java/jre/bin/java",
                "-classpath",
                "/opt/toolkits/topology/lib/com.ibm.streamsx.topology.jar:/opt/ibm/streams/lib/com.ibm.streams.operator.samples.jar",
                "com.ibm.streamsx.topology.context.StreamsContextSubmit",
                "STANDALONE",
                "/tmp/splpytmp1234.json",
            ]
        );
    }

    #[test]
    fn unknown_context_type_is_forwarded_verbatim() {
        let ctx: ContextType = "EMBEDDED_TEST".parse().unwrap();
        let cmd = layout().command(&ctx, Path::new("/tmp/d.json"));
        assert_eq!(cmd.argv()[4], "EMBEDDED_TEST");
    }

    #[test]
    fn empty_roots_are_rejected() {
        assert!(matches!(
            RuntimeLayout::new("", "/tk"),
            Err(ExecError::InvalidLayout(_))
        ));
        assert!(matches!(
            RuntimeLayout::new("/install", ""),
            Err(ExecError::InvalidLayout(_))
        ));
    }

    #[test]
    fn discovery_walks_up_to_toolkit_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("com.ibm.streamsx.topology");
        fs::create_dir_all(root.join("lib")).unwrap();
        fs::write(root.join("lib/com.ibm.streamsx.topology.jar"), b"").unwrap();

        let nested = root.join("opt/rust/bin");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(discover_toolkit_root(&nested), Some(root.clone()));
        assert_eq!(discover_toolkit_root(&root), Some(root));
    }

    #[test]
    fn discovery_returns_none_without_marker() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(discover_toolkit_root(&nested), None);
    }
}
