mod domain;
pub use domain::{DEPLOY_KEY, GRAPH_KEY};
pub use domain::{Env, SerializedGraph};
pub use domain::{Graph, GraphError};

mod error;
pub use error::{ModelError, ModelResult};

mod kind;
pub use kind::ContextType;

mod descriptor;
pub use descriptor::{DeployOptions, SubmissionDescriptor};
