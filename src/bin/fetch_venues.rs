use clap::Parser;
use venue_refile::app::documents::{load_access_token, load_user_config};
use venue_refile::utils::error::ErrorSeverity;
use venue_refile::utils::{logger, validation::Validate};
use venue_refile::{
    CliConfig, EtlEngine, FetchPipeline, FoursquareSession, LocalStorage, RefileError, Settings,
};

#[derive(Parser)]
#[command(name = "fetch_venues")]
#[command(about = "Fetch every saved list, cache the raw items and clean them into a venue table")]
struct Args {
    #[command(flatten)]
    cli: CliConfig,
}

async fn fetch(config: &CliConfig) -> Result<String, RefileError> {
    let storage = LocalStorage::new(config.data_dir.clone());

    let settings = Settings::load_or_default(&storage).await?;
    settings.validate()?;
    if config.verbose {
        tracing::debug!("Settings: {:?}", settings);
    }

    let token = load_access_token(&storage, &settings.files.token).await?;
    let user = load_user_config(&storage, &settings.files.user_config).await?;
    let session = FoursquareSession::new(token.access_token, &settings.api)?;

    let pipeline = FetchPipeline::new(storage.clone(), session, settings, user.user_id);
    let report = EtlEngine::new(pipeline).run().await?;

    println!(
        "✅ Cleaned {} raw items into {} venues",
        report.raw_items, report.venues
    );
    Ok(storage.resolve(&report.output_path).display().to_string())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logger::init_cli_logger(args.cli.verbose);

    tracing::info!("Starting fetch_venues in {}", args.cli.data_dir.display());

    match fetch(&args.cli).await {
        Ok(output_path) => {
            println!("📁 Venue table saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Fetch failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
