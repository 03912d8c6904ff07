//! Configuration for rover.
//!
//! Options are resolved into one [`RoverOptions`] record in a fixed order:
//!
//! 1. [`RoverOptions::default`] supplies the built-in defaults
//! 2. [`env::apply_env`] overlays `ROVER_*` environment variables
//! 3. [`crate::cli::apply_matches`] overlays flags given on the command line
//! 4. [`validate::validate`] checks the merged record
//!
//! List values (`tf-var-files`, `tf-vars`, `tf-backend-configs`) keep the
//! order they were given in, since Terraform lets later entries override
//! earlier ones.

pub mod env;
pub mod resolver;
pub mod schema;
pub mod validate;

pub use env::{ConfigParseError, apply_env, apply_process_env, from_process};
pub use resolver::{Provenance, Resolution, ValueSource};
pub use schema::{
    ENV_PREFIX, LIST_DELIMITER, OPTIONS, OptionGroup, OptionId, OptionKind, OptionSpec,
    OptionValue, RoverOptions, Slot,
};
pub use validate::{ConfigValidationError, Violation, validate};
