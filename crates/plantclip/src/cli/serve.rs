//! The `plantclip serve` command.

use std::sync::Arc;

use clap::Args;
use plantclip_core::{ClassificationService, Config};

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Interface to bind (overrides `server.host`)
    #[arg(long, env = "BIOCLIP_HOST")]
    pub host: Option<String>,

    /// Port to bind (overrides `server.port`)
    #[arg(short, long, env = "BIOCLIP_PORT")]
    pub port: Option<u16>,
}

/// Execute the serve command.
pub async fn execute(args: ServeArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let model_dir = config.model_dir();
    if !plantclip_core::BioClipModel::is_installed(&config.model, &model_dir) {
        tracing::warn!(
            "Model files missing from {:?}; requests will fail until they are installed \
             (see `plantclip models list`)",
            model_dir
        );
    }

    tracing::info!(
        "Model: BioCLIP, device: {}, labels: {}",
        if config.model.use_cpu { "cpu" } else { "gpu" },
        plantclip_core::PLANT_CLASSES.len()
    );

    let service = Arc::new(ClassificationService::new(&config));
    crate::server::serve(service, &config.server.address()).await
}
