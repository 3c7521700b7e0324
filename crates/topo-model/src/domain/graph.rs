use std::error::Error as StdError;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Failure raised by a [`Graph`] while producing its JSON form.
///
/// Carries the original error as its source so callers can inspect it.
#[derive(Debug, Error)]
#[error("graph serialization failed: {0}")]
pub struct GraphError(#[source] Box<dyn StdError + Send + Sync + 'static>);

impl GraphError {
    pub fn new(err: impl Into<Box<dyn StdError + Send + Sync + 'static>>) -> Self {
        Self(err.into())
    }

    /// Create an error from a plain message.
    pub fn msg(msg: impl Into<String>) -> Self {
        Self(msg.into().into())
    }

    pub fn into_inner(self) -> Box<dyn StdError + Send + Sync + 'static> {
        self.0
    }
}

/// A data-flow graph that can be submitted.
///
/// The submission layer never looks inside the graph: the only capability it
/// needs is turning it into a JSON value that becomes the `graph` entry of the
/// submission descriptor.
pub trait Graph {
    fn to_graph_json(&self) -> Result<Value, GraphError>;
}

impl Graph for Value {
    fn to_graph_json(&self) -> Result<Value, GraphError> {
        Ok(self.clone())
    }
}

/// Adapter that turns any `Serialize` type into a [`Graph`].
///
/// ```rust
/// use serde::Serialize;
/// use topo_model::{Graph, SerializedGraph};
///
/// #[derive(Serialize)]
/// struct Topology {
///     name: String,
/// }
///
/// let graph = SerializedGraph(Topology { name: "wordcount".into() });
/// let json = graph.to_graph_json().unwrap();
/// assert_eq!(json["name"], "wordcount");
/// ```
#[derive(Debug, Clone)]
pub struct SerializedGraph<T>(pub T);

impl<T: Serialize> Graph for SerializedGraph<T> {
    fn to_graph_json(&self) -> Result<Value, GraphError> {
        serde_json::to_value(&self.0).map_err(GraphError::new)
    }
}
