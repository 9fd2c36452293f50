//! Command line utility that runs a single guess against the live services.
//!
//! Usage: `guess <name...>`

use rust_name_guesser::config::Config;
use rust_name_guesser::guesser::GuessService;
use std::env;
use std::error::Error;

/// Main entry point for the guess utility.
///
/// Joins all arguments into one name, runs the guess and prints the result.
/// Upstream details of a failure are logged; the printed message stays generic.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_name_guesser=warn".into()),
        )
        .init();

    let name = env::args().skip(1).collect::<Vec<_>>().join(" ");
    if name.trim().is_empty() {
        anyhow::bail!("Usage: guess <name>");
    }

    let config = Config::from_env()?;
    let service = GuessService::new(&config);

    match service.guess(&name).await {
        Ok(result) => {
            println!("Name:    {}", name.trim());
            println!("Age:     {}", result.age);
            println!("Gender:  {}", result.gender);
            println!("Country: {}", result.country_display_name);
            Ok(())
        }
        Err(e) => {
            if let Some(cause) = e.source() {
                tracing::error!("Guess failed: {}", cause);
            }
            anyhow::bail!("{}", e)
        }
    }
}
