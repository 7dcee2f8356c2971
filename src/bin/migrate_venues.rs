use clap::Parser;
use venue_refile::app::documents::{load_access_token, load_destination_lists, load_venue_table};
use venue_refile::core::choice::ChoiceMenu;
use venue_refile::core::progress::Progress;
use venue_refile::utils::error::ErrorSeverity;
use venue_refile::utils::{logger, validation::Validate};
use venue_refile::{
    CliConfig, FoursquareSession, LocalStorage, MigrationRun, ProgressFiles, RefileError,
    RunOutcome, Settings,
};

#[derive(Parser)]
#[command(name = "migrate_venues")]
#[command(about = "Interactively re-file each cleaned venue into a destination list")]
struct Args {
    #[command(flatten)]
    cli: CliConfig,
}

/// Exit status for a run stopped by Ctrl-C.
const INTERRUPTED_EXIT_CODE: i32 = 130;

async fn migrate(config: &CliConfig) -> Result<RunOutcome, RefileError> {
    let storage = LocalStorage::new(config.data_dir.clone());

    let settings = Settings::load_or_default(&storage).await?;
    settings.validate()?;
    let files = &settings.files;

    let token = load_access_token(&storage, &files.token).await?;
    let venues = load_venue_table(&storage, &files.venues_cache).await?;
    let destinations = load_destination_lists(&storage, &files.destination_lists).await?;
    let progress = Progress::load(&storage, &files.categorized, &files.skipped).await?;

    let session = FoursquareSession::new(token.access_token, &settings.api)?;
    let menu = ChoiceMenu::new(destinations.lists);
    tracing::info!("{} destination lists on the menu", menu.len());

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut run = MigrationRun::new(&session, menu, &venues, progress, stdin, std::io::stdout());

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Ctrl-C handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let progress_files = ProgressFiles {
        categorized: &files.categorized,
        skipped: &files.skipped,
    };
    let outcome = run.run(&storage, progress_files, shutdown).await?;

    let saved = run.progress();
    tracing::info!(
        "Progress now covers {} categorized and {} skipped venues",
        saved.categorized().len(),
        saved.skipped().len()
    );
    Ok(outcome)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logger::init_cli_logger(args.cli.verbose);

    tracing::info!("Starting migrate_venues in {}", args.cli.data_dir.display());

    match migrate(&args.cli).await {
        Ok(RunOutcome::Interrupted) => std::process::exit(INTERRUPTED_EXIT_CODE),
        Ok(outcome) => tracing::info!("✅ Migration finished: {:?}", outcome),
        Err(e) => {
            tracing::error!(
                "❌ Migration stopped: {} (Category: {:?}, Severity: {:?})",
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
