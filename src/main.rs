//! Mutual Aid - Association credit and matching engine
//!
//! Runs synthetic loads and inspects seed files and configuration.

// Use the library crate for all modules
use mutual_aid::cli;

fn main() -> anyhow::Result<()> {
    // Initialize logging (WARN level by default, use RUST_LOG=info for details)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into())
        )
        .init();

    // Run CLI
    cli::run()
}
