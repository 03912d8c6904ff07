//! Rover - Interactive Terraform visualization, State and configuration explorer.
//!
//! This library provides the entry-point configuration layer for the `rover`
//! binary: the option schema, layered resolution from defaults, `ROVER_*`
//! environment variables and command-line flags, validation of the merged
//! result, and the hand-off to asset generation.

pub mod cli;
pub mod config;
pub mod dispatch;

/// Library-level error type for rover.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] config::ConfigParseError),

    #[error(transparent)]
    Validation(#[from] config::ConfigValidationError),

    #[error(transparent)]
    Dispatch(#[from] dispatch::DispatchFailure),

    #[error(transparent)]
    Usage(#[from] clap::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for rover operations.
pub type Result<T> = std::result::Result<T, Error>;
