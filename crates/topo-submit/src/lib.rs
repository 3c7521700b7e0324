//! Submission of a topology graph to the external runtime.
//!
//! A submission runs three steps in order:
//! 1. wrap the graph's JSON form in a [`SubmissionDescriptor`];
//! 2. write the descriptor to a temporary `splpytmp*.json` file;
//! 3. run the runtime's submit entry point on that file, echoing its output.
//!
//! The descriptor file is removed on every path out of [`Submitter::submit`].
//!
//! ```no_run
//! use serde_json::json;
//! use topo_model::ContextType;
//! use topo_submit::{SubmitConfig, Submitter};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SubmitConfig::from_env()?;
//! let graph = json!({"name": "app", "operators": []});
//!
//! let outcome = Submitter::new(&config)?
//!     .submit(&ContextType::Standalone, &graph)
//!     .await?
//!     .into_result()?;
//! println!("runtime exited with {:?}", outcome.exit_code());
//! # Ok(())
//! # }
//! ```
mod config;
pub use config::SubmitConfig;
pub use config::{ENV_DESCRIPTOR_DIR, ENV_INSTALL, ENV_KEEP_DESCRIPTOR, ENV_TOOLKIT};

mod descriptor;
pub use descriptor::{DESCRIPTOR_PREFIX, DESCRIPTOR_SUFFIX, DescriptorFile, write_descriptor};

mod error;
pub use error::{ConfigError, SubmitError};

mod outcome;
pub use outcome::SubmissionOutcome;

mod submitter;
pub use submitter::{Submitter, submit};

pub use topo_exec::{CollectSink, ConsoleSink, ExecError, LineSink, StreamKind};
pub use topo_model::{ContextType, DeployOptions, Env, Graph, GraphError, SubmissionDescriptor};
