mod seed;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::env;

#[derive(Parser)]
#[command(name = "trivet")]
#[command(about = "Trivet CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the database with categories, users, and sample recipes
    Seed {
        /// Postgres connection string (defaults to $DATABASE_URL)
        #[arg(long)]
        database_url: Option<String>,
        /// Password given to every seed user
        #[arg(long, default_value = "password123")]
        password: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Seed {
            database_url,
            password,
        } => {
            let database_url = match database_url {
                Some(url) => url,
                None => env::var("DATABASE_URL")
                    .context("--database-url not given and DATABASE_URL not set")?,
            };
            seed::seed(&database_url, &password)?;
        }
    }

    Ok(())
}
