use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize, Serializer};

use crate::ModelError;

/// How the external runtime should treat a submission.
///
/// The value is passed to the runtime verbatim as a command-line argument.
/// The well-known kinds get their own variants; anything else is kept
/// unchanged in [`ContextType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ContextType {
    /// Submit to a running instance of the managed cluster.
    Distributed,
    /// Build and run as a standalone process on the local host.
    Standalone,
    /// Produce a deployable application bundle without running it.
    Bundle,
    /// Produce a standalone bundle.
    StandaloneBundle,
    /// Generate the intermediate toolkit only.
    Toolkit,
    /// Produce a build archive for remote compilation.
    BuildArchive,
    /// Submit to a hosted analytics service.
    AnalyticsService,
    /// Kind unknown to this crate, forwarded as-is.
    Other(String),
}

impl ContextType {
    /// Returns the exact string handed to the external runtime.
    pub fn as_str(&self) -> &str {
        match self {
            ContextType::Distributed => "DISTRIBUTED",
            ContextType::Standalone => "STANDALONE",
            ContextType::Bundle => "BUNDLE",
            ContextType::StandaloneBundle => "STANDALONE_BUNDLE",
            ContextType::Toolkit => "TOOLKIT",
            ContextType::BuildArchive => "BUILD_ARCHIVE",
            ContextType::AnalyticsService => "ANALYTICS_SERVICE",
            ContextType::Other(s) => s,
        }
    }

    /// Returns `true` for kinds this crate knows by name.
    pub fn is_known(&self) -> bool {
        !matches!(self, ContextType::Other(_))
    }
}

impl FromStr for ContextType {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ModelError::InvalidContextType(s.to_string()));
        }
        Ok(match s {
            "DISTRIBUTED" => Self::Distributed,
            "STANDALONE" => Self::Standalone,
            "BUNDLE" => Self::Bundle,
            "STANDALONE_BUNDLE" => Self::StandaloneBundle,
            "TOOLKIT" => Self::Toolkit,
            "BUILD_ARCHIVE" => Self::BuildArchive,
            "ANALYTICS_SERVICE" => Self::AnalyticsService,
            other => Self::Other(other.to_string()),
        })
    }
}

impl fmt::Display for ContextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ContextType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ContextType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}
