//! `finance-api` binary.
//!
//! `serve` runs the REST API for budgets, projects, project tracking,
//! subscription revenue, subscription plans and the financial summary.
//! `migrate` manages the `documents` table those groups share.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use finance_api::{
    cli::{Cli, Commands},
    commands,
    config::Config,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::from_env();
    tracing::debug!(?config, "Configuration loaded");

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::execute(args, config).await,
        Commands::Migrate(args) => commands::migrate::execute(args, config).await,
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "finance-api command failed");
        std::process::exit(1);
    }
}

/// `--verbose` forces debug output for this crate and the HTTP layer;
/// otherwise `RUST_LOG` decides, defaulting to `info`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("finance_api=debug,domain=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}
