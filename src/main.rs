//! Rover CLI - Interactive Terraform visualization, State and configuration explorer.

use rover::dispatch::LocalAssets;
use std::io::{self, IsTerminal};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();

    match rover::cli::run(&LocalAssets, &mut io::stdout()) {
        Ok(()) => {}
        // --help and --version
        Err(rover::Error::Usage(e)) if !e.use_stderr() => e.exit(),
        Err(rover::Error::Usage(e)) => {
            eprintln!("[ERROR] {}", e.to_string().trim_end());
            process::exit(e.exit_code());
        }
        Err(e) => {
            eprintln!("[ERROR] {}", e);
            process::exit(1);
        }
    }
}
