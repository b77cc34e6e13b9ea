use anyhow::Result;
use clap::Parser;

use offer_forge::cli::commands::{
    resolve_config, show_how_to_get_started, ChecklistCommand, Command, GenerateCommand,
    NichesCommand, OracleCommand, StatusCommand,
};
use offer_forge::cli::{Cli, Commands};
use offer_forge::generators::OfferInput;
use offer_forge::{generation_metrics, init_telemetry, shutdown_telemetry};

fn main() -> Result<()> {
    let Cli {
        session: args,
        command,
    } = Cli::parse();
    let config = resolve_config(&args)?;

    // Logging is best-effort; a second subscriber is not fatal.
    if let Err(e) = init_telemetry(&config.observability) {
        eprintln!("Warning: failed to initialize logging: {e}");
    }

    let result = tokio::runtime::Runtime::new()?.block_on(async {
        match command {
            // Default behavior: no subcommand - explain how to get started
            None => show_how_to_get_started(),
            Some(Commands::Generate {
                niche,
                pain,
                format,
                copy,
            }) => {
                GenerateCommand::new(config.clone(), OfferInput::new(niche, pain, format))
                    .with_tier(args.tier.clone())
                    .with_copy(copy)
                    .with_json(args.json)
                    .execute()
                    .await
            }
            Some(Commands::Oracle { archetype, count }) => {
                OracleCommand::new(config.clone(), archetype, count)
                    .with_tier(args.tier.clone())
                    .with_json(args.json)
                    .execute()
                    .await
            }
            Some(Commands::Checklist { done }) => {
                ChecklistCommand::new(config.clone(), done)
                    .with_tier(args.tier.clone())
                    .with_json(args.json)
                    .execute()
                    .await
            }
            Some(Commands::Status) => {
                StatusCommand::new(config.clone())
                    .with_tier(args.tier.clone())
                    .with_json(args.json)
                    .execute()
                    .await
            }
            Some(Commands::Niches) => NichesCommand::new().with_json(args.json).execute().await,
        }
    });

    if config.observability.metrics_enabled {
        generation_metrics().log_stats();
    }
    shutdown_telemetry();
    result
}
