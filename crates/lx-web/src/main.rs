use anyhow::Context;
use clap::Parser;
use lx_config::LxConfig;
use lx_db::service::LxService;

mod cli;
mod commands;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("lxd error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let mut config = LxConfig::load_with_dotenv().context("failed to load configuration")?;
    if let Some(db) = &cli.db {
        config.database.path.clone_from(db);
    }
    if config.database.is_in_memory() {
        tracing::warn!("using an in-memory database; changes are lost on exit");
    }

    let service = LxService::new_local(&config.database.path)
        .await
        .with_context(|| format!("failed to open database at {}", config.database.path))?;

    match &cli.command {
        cli::Commands::Serve(args) => commands::serve(args, config, service).await,
        cli::Commands::Predict(args) => commands::predict(args, &config, &service).await,
        cli::Commands::Seed => commands::seed(&service).await,
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("LIFEX_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
