//! Well-known keys of the submission descriptor.
//!
//! The external runtime reads these two top-level keys and nothing else.

/// Key holding deployment options (currently always an empty mapping).
pub const DEPLOY_KEY: &str = "deploy";

/// Key holding the serialized graph.
pub const GRAPH_KEY: &str = "graph";
