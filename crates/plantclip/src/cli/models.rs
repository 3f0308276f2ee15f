//! The `plantclip models` command for inspecting model files.

use clap::{Args, Subcommand};
use plantclip_core::{BioClipModel, Config};

/// Arguments for the `models` command.
#[derive(Args, Debug)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommand,
}

/// Subcommands for model management.
#[derive(Subcommand, Debug)]
pub enum ModelsCommand {
    /// List the model files and whether each is installed
    List,

    /// Show model directory path
    Path,
}

/// Execute the models command.
pub async fn execute(args: ModelsArgs, config: &Config) -> anyhow::Result<()> {
    let model_dir = config.model_dir();

    match args.command {
        ModelsCommand::List => {
            println!("BioCLIP model files:");
            println!("  Directory: {}\n", model_dir.display());

            for (path, exists) in BioClipModel::required_files(&config.model, &model_dir) {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let status = if exists { "installed" } else { "missing" };
                println!("    - {:30} {}", name, status);
            }

            if !BioClipModel::is_installed(&config.model, &model_dir) {
                println!(
                    "\nExport the BioCLIP encoders to ONNX and place them in the directory above."
                );
            }
        }

        ModelsCommand::Path => {
            println!("{}", model_dir.display());
        }
    }

    Ok(())
}
