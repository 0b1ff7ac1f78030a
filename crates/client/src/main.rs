//! Pursuit command line client.
//!
//! Composition root: loads configuration, installs logging, starts a
//! [`pursuit_runtime::Runtime`] and drives a scripted session through it.
//!
//! ```bash
//! # Two rounds of a distance-4 chase with seeded dice
//! cargo run -p pursuit-client -- simulate --command "4 Simple Athletics" \
//!     --quarry thief:Thief:42 --pursuer guard:Guard:35 --rounds 2 --seed 7
//! ```

mod session;

use anyhow::Result;
use clap::Parser;
use session::Simulate;

/// Chase scenes resolved from the command line
#[derive(Parser)]
#[command(name = "pursuit")]
#[command(about = "Run pursuit contests", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Start a pursuit and resolve rounds with seeded dice
    Simulate(Simulate),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging();

    let cli = Cli::parse();
    match cli.command {
        Command::Simulate(cmd) => cmd.execute().await,
    }
}

/// Log to stderr so stdout stays clean for the session output.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
