//! Strata CLI binary.

use anyhow::Result;
use strata::cli::Cli;
use tracing_subscriber::EnvFilter;

/// Main entry point for the strata CLI.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Logs go to stderr so --json output stays parseable.
    // RUST_LOG overrides --verbose, e.g. RUST_LOG=strata_manifest=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting strata CLI");

    cli.execute().await?;

    tracing::debug!("Strata CLI completed successfully");
    Ok(())
}
