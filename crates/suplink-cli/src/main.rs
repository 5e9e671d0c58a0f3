mod db;
mod search;

use clap::{Parser, Subcommand};
use suplink_core::SearchMode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "suplink")]
#[command(about = "Supplier discovery from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search for suppliers of a product in a country
    Search {
        /// Product or component to source (e.g., "hex bolts")
        product: String,
        /// Country to source from (e.g., India)
        country: String,
        /// Search depth: quick or deep
        #[arg(long, default_value = "quick")]
        mode: SearchMode,
        /// User id attached to the saved search (defaults to `SUPLINK_USER_ID`)
        #[arg(long)]
        user_id: Option<String>,
        /// Print the ranked results as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Show the analyzed suppliers of a saved search
    Analyzed {
        /// Search id logged when the search was saved
        search_id: String,
        /// Print the suppliers as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Database utilities
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = suplink_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Search {
            product,
            country,
            mode,
            user_id,
            json,
        } => {
            let args = search::SearchArgs {
                product,
                country,
                mode,
                user_id,
                json,
            };
            search::run_search(&config, args).await
        }
        Commands::Analyzed { search_id, json } => {
            search::run_analyzed(&config, &search_id, json).await
        }
        Commands::Db { command } => match command {
            DbCommands::Ping => db::run_ping(&config).await,
            DbCommands::Migrate => db::run_migrate(&config).await,
        },
    }
}

#[cfg(test)]
mod tests;
