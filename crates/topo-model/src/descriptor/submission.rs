use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{DeployOptions, Graph, GraphError, ModelResult};

/// The JSON document handed to the external runtime.
///
/// Encoded form:
///
/// ```json
/// {
///   "deploy": {},
///   "graph": { ... }
/// }
/// ```
///
/// The graph is wrapped as-is; no validation or rewriting is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionDescriptor {
    /// Deployment options (`deploy` key).
    pub deploy: DeployOptions,
    /// Serialized graph (`graph` key).
    pub graph: Value,
}

impl SubmissionDescriptor {
    /// Wrap the JSON form of `graph` with default (empty) deployment options.
    ///
    /// Errors raised by the graph are returned unchanged.
    pub fn from_graph<G>(graph: &G) -> Result<Self, GraphError>
    where
        G: Graph + ?Sized,
    {
        Ok(Self {
            deploy: DeployOptions::default(),
            graph: graph.to_graph_json()?,
        })
    }

    /// Replace the deployment options.
    pub fn with_deploy(mut self, deploy: DeployOptions) -> Self {
        self.deploy = deploy;
        self
    }

    /// Canonical encoding: keys sorted at every level, two-space indent,
    /// `": "` between key and value, no trailing newline.
    ///
    /// The same descriptor always yields the same bytes.
    pub fn to_json_pretty(&self) -> ModelResult<String> {
        let value = canonical(serde_json::to_value(self)?);
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

/// Rebuild every object with its keys in sorted order.
fn canonical(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> =
                map.into_iter().map(|(k, v)| (k, canonical(v))).collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonical).collect()),
        other => other,
    }
}
