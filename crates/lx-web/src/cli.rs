use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for the `lxd` binary.
#[derive(Debug, Parser)]
#[command(name = "lxd", version, about = "Lifex - life expectancy dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Database path (overrides `database.path`)
    #[arg(long, global = true)]
    pub db: Option<String>,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Run the dashboard server.
    Serve(ServeArgs),
    /// Predict a country's life expectancy for a target year.
    Predict(PredictArgs),
    /// Load the demonstration dataset.
    Seed,
}

#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Bind host (overrides `server.host`)
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (overrides `server.port`)
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[derive(Clone, Debug, Args)]
pub struct PredictArgs {
    /// Country name or numeric id
    #[arg(short, long)]
    pub country: String,

    /// Year to extrapolate to (defaults to `predictor.default_target_year`)
    #[arg(short, long)]
    pub target_year: Option<i32>,
}
