mod env;
pub use env::Env;

mod graph;
pub use graph::{Graph, GraphError, SerializedGraph};

mod constants;
pub use constants::{DEPLOY_KEY, GRAPH_KEY};
