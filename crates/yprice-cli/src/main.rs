//! yprice - Yearly closing prices for a list of company names.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use yprice_cli::{app, render_summary, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Log to stderr; RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> yprice_cli::Result<()> {
    let metrics = app::run(cli).await?;

    if let Some(format) = cli.summary {
        println!("{}", render_summary(&metrics, format)?);
    }
    Ok(())
}
