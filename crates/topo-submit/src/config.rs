use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use topo_exec::{RuntimeLayout, discover_toolkit_root};
use topo_model::{DeployOptions, Env};
use tracing::debug;

use crate::ConfigError;

/// Installation root of the external runtime (required).
pub const ENV_INSTALL: &str = "STREAMS_INSTALL";

/// Explicit toolkit root.
pub const ENV_TOOLKIT: &str = "STREAMSX_TOPOLOGY_TOOLKIT";

/// Directory for descriptor files; the platform temp dir when unset.
pub const ENV_DESCRIPTOR_DIR: &str = "TOPO_DESCRIPTOR_DIR";

/// Keep descriptor files after submission (`1`/`true`/`yes`/`on`).
pub const ENV_KEEP_DESCRIPTOR: &str = "TOPO_KEEP_DESCRIPTOR";

/// Everything a submission needs to know about its surroundings.
///
/// Built once at the program boundary, usually with
/// [`SubmitConfig::from_env`], and passed down explicitly. Nothing below this
/// point reads the process environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmitConfig {
    /// Installation root of the external runtime.
    pub install: Option<PathBuf>,
    /// Toolkit root holding `lib/com.ibm.streamsx.topology.jar`.
    pub toolkit: Option<PathBuf>,
    /// Where descriptor files are created.
    pub descriptor_dir: Option<PathBuf>,
    /// Leave the descriptor file on disk after the submission.
    pub keep_descriptor: bool,
    /// Extra environment for the external runtime.
    #[serde(skip_serializing_if = "Env::is_empty")]
    pub env: Env,
    /// Written to the `deploy` entry of every descriptor.
    #[serde(skip_serializing_if = "DeployOptions::is_empty")]
    pub deploy: DeployOptions,
}

impl SubmitConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_vars(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`.
    ///
    /// Fails with [`ConfigError::MissingInstall`] when [`ENV_INSTALL`] is
    /// unset or empty. Empty optional variables are treated as unset.
    pub fn from_env_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let install = var(ENV_INSTALL).ok_or(ConfigError::MissingInstall)?;
        let keep_descriptor = match var(ENV_KEEP_DESCRIPTOR) {
            Some(raw) => parse_switch(ENV_KEEP_DESCRIPTOR, &raw)?,
            None => false,
        };

        let cfg = Self {
            install: Some(install.into()),
            toolkit: var(ENV_TOOLKIT).map(PathBuf::from),
            descriptor_dir: var(ENV_DESCRIPTOR_DIR).map(PathBuf::from),
            keep_descriptor,
            env: Env::default(),
            deploy: DeployOptions::default(),
        };
        debug!(
            install = ?cfg.install,
            toolkit = ?cfg.toolkit,
            descriptor_dir = ?cfg.descriptor_dir,
            keep_descriptor = cfg.keep_descriptor,
            "submission config loaded from environment"
        );
        Ok(cfg)
    }

    pub fn with_install(mut self, install: impl Into<PathBuf>) -> Self {
        self.install = Some(install.into());
        self
    }

    pub fn with_toolkit(mut self, toolkit: impl Into<PathBuf>) -> Self {
        self.toolkit = Some(toolkit.into());
        self
    }

    /// Fill in the toolkit root by searching upwards from `start` when it is
    /// not configured yet. See [`discover_toolkit_root`].
    pub fn with_discovered_toolkit(mut self, start: &Path) -> Result<Self, ConfigError> {
        if self.toolkit.is_none() {
            let found = discover_toolkit_root(start).ok_or_else(|| ConfigError::ToolkitNotFound {
                start: start.to_path_buf(),
            })?;
            self.toolkit = Some(found);
        }
        Ok(self)
    }

    /// Directory where descriptor files are created.
    pub fn descriptor_dir(&self) -> PathBuf {
        self.descriptor_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }

    /// Validated runtime layout.
    pub fn layout(&self) -> Result<RuntimeLayout, ConfigError> {
        let install = self.install.as_ref().ok_or(ConfigError::MissingInstall)?;
        let toolkit = self.toolkit.as_ref().ok_or(ConfigError::MissingToolkit)?;

        RuntimeLayout::new(install, toolkit).map_err(|e| ConfigError::InvalidLayout(e.to_string()))
    }
}

fn parse_switch(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: raw.to_string(),
        }),
    }
}
