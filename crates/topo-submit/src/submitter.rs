use std::{fmt, path::PathBuf, sync::Arc};

use topo_exec::{Launcher, LineSink, RuntimeLayout};
use topo_model::{ContextType, DeployOptions, Env, Graph, SubmissionDescriptor};
use tracing::{debug, info, warn};

use crate::{
    DescriptorFile, SubmissionOutcome, SubmitConfig, SubmitError, descriptor::write_descriptor,
};

/// Submits graphs to the external runtime with a fixed configuration.
///
/// The configuration is validated on construction, so a misconfigured
/// submitter never writes a descriptor or starts a process.
#[derive(Clone)]
pub struct Submitter {
    layout: RuntimeLayout,
    descriptor_dir: PathBuf,
    keep_descriptor: bool,
    env: Env,
    deploy: DeployOptions,
    launcher: Launcher,
}

impl Submitter {
    /// Create a submitter that echoes runtime output to the console.
    pub fn new(config: &SubmitConfig) -> Result<Self, SubmitError> {
        Ok(Self {
            layout: config.layout()?,
            descriptor_dir: config.descriptor_dir(),
            keep_descriptor: config.keep_descriptor,
            env: config.env.clone(),
            deploy: config.deploy.clone(),
            launcher: Launcher::console(),
        })
    }

    /// Send runtime output to `sink` instead of the console.
    pub fn with_sink(mut self, sink: Arc<dyn LineSink>) -> Self {
        self.launcher = Launcher::new(sink);
        self
    }

    pub fn layout(&self) -> &RuntimeLayout {
        &self.layout
    }

    /// Submit `graph` with context type `ctx`.
    ///
    /// Steps, in order: serialize the graph, write the descriptor file, run
    /// the runtime on it, remove the file. The file is removed whether or not
    /// the launch succeeded.
    ///
    /// Returns `Ok` once the runtime has exited and all of its output has
    /// been echoed, regardless of its exit code.
    pub async fn submit<G>(&self, ctx: &ContextType, graph: &G) -> Result<SubmissionOutcome, SubmitError>
    where
        G: Graph + ?Sized,
    {
        info!(%ctx, "submitting topology");

        let descriptor = SubmissionDescriptor::from_graph(graph)?.with_deploy(self.deploy.clone());
        let file = write_descriptor(&descriptor, &self.descriptor_dir)?;

        let cmd = self
            .layout
            .command(ctx, file.path())
            .with_env(self.env.clone());
        debug!(%cmd, "launching external runtime");

        // Both readers are joined inside `launch`, so the file outlives them.
        let launched = self.launcher.launch(&cmd).await;
        let kept = self.release(file);
        let launch = launched?;

        for fault in launch.faults() {
            warn!(%fault, "runtime output was not fully echoed");
        }
        match launch.code() {
            Some(0) => info!(%ctx, "submission completed"),
            code => warn!(%ctx, ?code, "external runtime exited unsuccessfully"),
        }

        Ok(SubmissionOutcome::new(ctx.clone(), launch, kept))
    }

    /// Delete the descriptor, or keep it when configured to.
    fn release(&self, file: DescriptorFile) -> Option<PathBuf> {
        let path = file.path().to_path_buf();

        if self.keep_descriptor {
            return match file.keep() {
                Ok(kept) => {
                    info!(path = %kept.display(), "descriptor kept");
                    Some(kept)
                }
                Err(e) => {
                    warn!(path = %path.display(), "failed to keep descriptor: {e}");
                    None
                }
            };
        }

        if let Err(e) = file.remove() {
            warn!(path = %path.display(), "failed to remove descriptor: {e}");
        }
        None
    }
}

impl fmt::Debug for Submitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Submitter")
            .field("layout", &self.layout)
            .field("descriptor_dir", &self.descriptor_dir)
            .field("keep_descriptor", &self.keep_descriptor)
            .field("env_len", &self.env.len())
            .field("deploy_len", &self.deploy.len())
            .finish()
    }
}

/// One-shot submission with console output.
///
/// Equivalent to `Submitter::new(config)?.submit(ctx, graph)`.
pub async fn submit<G>(
    config: &SubmitConfig,
    ctx: &ContextType,
    graph: &G,
) -> Result<SubmissionOutcome, SubmitError>
where
    G: Graph + ?Sized,
{
    Submitter::new(config)?.submit(ctx, graph).await
}
