//! # Casepath - Case Interview Coach
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! casepath server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! casepath journey --detailed
//! casepath record case_1 --passed -s problem_solving=82 -s creativity=64
//! casepath targets -k 2
//! casepath prepare case_2 --area mental_math --answer 12
//! ```

use casepath::cli;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber. `CASEPATH_LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let json = std::env::var("CASEPATH_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("casepath=info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(fmt::layer))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = cli::Cli::parse();

    // The banner goes to stderr so piped command output stays clean.
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    match cli::execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            ExitCode::FAILURE
        }
    }
}

/// Print the Casepath startup banner.
fn print_banner() {
    eprintln!(
        r#"
   ___ __ _ ___  ___ _ __   __ _| |_| |__
  / __/ _` / __|/ _ \ '_ \ / _` | __| '_ \
 | (_| (_| \__ \  __/ |_) | (_| | |_| | | |
  \___\__,_|___/\___| .__/ \__,_|\__|_| |_|
                    |_|

  Case Interview Coach v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
