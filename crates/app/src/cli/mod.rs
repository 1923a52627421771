use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dealfeed_app::{
    config::{BackendConfig, LoggingConfig},
    context::{AppContext, AppInitError, DealSource},
};

mod admin;
mod list;
mod promote;
mod show;
mod user;
mod vote;

#[derive(Debug, Parser)]
#[command(name = "dealfeed", about = "Browse and manage electronics deals", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    backend: BackendConfig,

    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    /// Serve deals from a fixture set instead of the backend
    #[arg(long, global = true)]
    fixture: Option<String>,

    /// Directory holding fixture sets
    #[arg(long, global = true, default_value = "./fixtures")]
    fixtures_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List deals
    List(list::ListArgs),

    /// Show a single deal
    Show(show::ShowArgs),

    /// Vote on a deal
    Vote(vote::VoteArgs),

    /// Promote a deal
    Promote(promote::PromoteArgs),

    /// Remove a deal's promotion
    Demote(promote::DemoteArgs),

    /// Admin table of every deal
    Admin(admin::AdminArgs),

    /// Show the signed-in user
    Whoami,

    /// Set the signed-in user's preferred location
    Location(user::LocationArgs),
}

impl Cli {
    /// Parse arguments, reading a `.env` file first if present.
    pub(crate) fn load() -> Self {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::parse()
    }

    pub(crate) async fn run(self) -> Result<(), String> {
        let source = match self.fixture {
            Some(name) => DealSource::Fixture {
                base_path: self.fixtures_dir,
                name,
            },
            None => DealSource::Backend,
        };

        let context = AppContext::new(&source, &self.backend).map_err(|error| match error {
            AppInitError::Fixture(fixture_error) => format!("failed to load fixture: {fixture_error}"),
            AppInitError::MissingBackend => error.to_string(),
        })?;

        match self.command {
            Commands::List(args) => list::run(args, &context).await,
            Commands::Show(args) => show::run(args, &context).await,
            Commands::Vote(args) => vote::run(args, &context).await,
            Commands::Promote(args) => promote::promote(args, &context).await,
            Commands::Demote(args) => promote::demote(args, &context).await,
            Commands::Admin(args) => admin::run(args, &context).await,
            Commands::Whoami => user::whoami(&context).await,
            Commands::Location(args) => user::location(args, &context).await,
        }
    }
}

/// Turn a write failure into a command error.
pub(crate) fn write_failed(error: std::io::Error) -> String {
    format!("failed to write output: {error}")
}
