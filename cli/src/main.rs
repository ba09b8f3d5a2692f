mod config;
mod logging;

use std::{process::ExitCode, sync::Arc};

use async_std::task;
use clap::{Args, Parser, Subcommand};
use cloud_storage::S3CloudStorage;
use core_types::{DeletionScope, DeletionStatus};
use database::repository_manager::RepositoryManager;
use pipeline_state::RedisPipelineState;
use service::video_deletion::{DeletionRequest, DeletionResponse, VideoDeletionService};

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "clipvault", version, about = "Maintenance tools for the clip vault")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Delete a video or a subset of its derived artifacts
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
struct DeleteArgs {
    /// Video identifier
    video_id: String,

    /// What to delete (all, video_file, moments or refined_moments)
    #[arg(long, default_value_t = DeletionScope::All)]
    scope: DeletionScope,

    /// Comma separated moment identifiers, only used with --scope moments
    #[arg(long)]
    moment_ids: Option<String>,

    /// Delete even while a pipeline run is active
    #[arg(long)]
    force: bool,
}

fn main() -> ExitCode {
    let _guard = logging::init_logging();
    let cli = Cli::parse();

    task::block_on(async {
        match cli.command {
            Command::Delete(args) => match delete(args).await {
                Ok(code) => code,
                Err(e) => {
                    tracing::error!("Deletion failed: {}", e);
                    eprintln!("Error: {}", e);
                    ExitCode::from(1)
                }
            },
        }
    })
}

async fn delete(args: DeleteArgs) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    let pool = database::connect(&config.database_url).await?;
    let repository_manager = Arc::new(RepositoryManager::new(pool));
    let cloud_storage = S3CloudStorage::connect(&config.cloud_storage).await?;
    let pipeline_state = RedisPipelineState::new(&config.pipeline_state)?;

    let service = VideoDeletionService::new(
        repository_manager,
        Arc::new(config.settings()),
        Arc::new(cloud_storage),
        Arc::new(pipeline_state),
    );

    let mut request = DeletionRequest::new(args.video_id, args.scope).with_force(args.force);
    if let Some(moment_ids) = &args.moment_ids {
        request = request.with_moment_ids(moment_ids);
    }

    let result = service.delete(request).await?;
    let code = match result.status {
        DeletionStatus::Failed => ExitCode::from(2),
        DeletionStatus::Completed | DeletionStatus::Partial => ExitCode::SUCCESS,
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&DeletionResponse::from(result))?
    );
    Ok(code)
}
