//! Hand-off from resolved configuration to asset generation.
//!
//! [`dispatch`] is the only place control leaves option resolution. It runs
//! the generator once and then prints usage help. A generator failure is
//! terminal: it comes back as [`DispatchFailure`] and the binary exits
//! non-zero without retrying.

use std::env;
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Command;

use crate::Result;
use crate::config::RoverOptions;

/// Why asset generation could not proceed.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("working directory {} does not exist or is not a directory", .0.display())]
    WorkingDir(PathBuf),

    #[error("plan file {} not found", .0.display())]
    MissingPlan(PathBuf),

    #[error("Terraform binary not found at {}", .0.display())]
    MissingTerraform(PathBuf),

    #[error("{0}")]
    Other(String),
}

/// Asset generation failed; no partial result exists.
#[derive(Debug, thiserror::Error)]
#[error("asset generation failed: {0}")]
pub struct DispatchFailure(#[from] pub GenerateError);

/// Produces the visualization assets for a validated configuration.
pub trait AssetGenerator {
    fn generate_assets(&self, options: &RoverOptions) -> std::result::Result<(), GenerateError>;
}

/// Where the plan comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanSource {
    /// Pre-generated `terraform show -json` output
    Json(PathBuf),
    /// Binary plan file from `terraform plan -out`
    Binary(PathBuf),
    /// Plan produced by running Terraform against the working directory
    Terraform { binary: PathBuf, workspace: Option<String> },
}

impl PlanSource {
    pub fn from_options(options: &RoverOptions) -> Self {
        if !options.plan_json_path.is_empty() {
            PlanSource::Json(PathBuf::from(&options.plan_json_path))
        } else if !options.plan_path.is_empty() {
            PlanSource::Binary(PathBuf::from(&options.plan_path))
        } else {
            PlanSource::Terraform {
                binary: PathBuf::from(&options.tf_path),
                workspace: Some(options.tf_workspace.clone()).filter(|w| !w.is_empty()),
            }
        }
    }
}

/// Generator for a local Terraform configuration.
///
/// Checks that the selected plan source's inputs are in place before any
/// rendering starts.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalAssets;

impl AssetGenerator for LocalAssets {
    fn generate_assets(&self, options: &RoverOptions) -> std::result::Result<(), GenerateError> {
        let working_dir = Path::new(&options.working_dir);
        if !working_dir.is_dir() {
            return Err(GenerateError::WorkingDir(working_dir.to_path_buf()));
        }

        let source = PlanSource::from_options(options);
        match &source {
            PlanSource::Json(path) | PlanSource::Binary(path) => {
                if !path.is_file() {
                    return Err(GenerateError::MissingPlan(path.clone()));
                }
            }
            PlanSource::Terraform { binary, .. } => {
                let search_path = env::var_os("PATH");
                let Some(found) = find_executable(binary, search_path.as_deref()) else {
                    return Err(GenerateError::MissingTerraform(binary.clone()));
                };
                tracing::debug!("Terraform binary resolved to {}", found.display());
            }
        }
        tracing::info!("Using plan source {:?}", source);

        if options.standalone {
            tracing::info!("Standalone output: {}.zip", options.zip_file_name);
        } else {
            tracing::info!("Visualization will be served on {}", options.listener);
        }
        if options.gen_image {
            tracing::info!("Graph image generation enabled");
        }

        Ok(())
    }
}

/// Locate `binary` on disk.
///
/// A bare command name such as `terraform` is searched for in each directory
/// of `search_path`; anything with a directory component is checked as given.
pub fn find_executable(binary: &Path, search_path: Option<&OsStr>) -> Option<PathBuf> {
    let is_bare = binary.components().count() == 1 && !binary.has_root();
    if !is_bare {
        return binary.is_file().then(|| binary.to_path_buf());
    }

    env::split_paths(search_path?)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(binary))
        .find(|candidate| candidate.is_file())
}

/// Run asset generation once, then write usage help to `out`.
pub fn dispatch<W: Write>(
    options: &RoverOptions,
    generator: &dyn AssetGenerator,
    command: &mut Command,
    out: &mut W,
) -> Result<()> {
    tracing::info!("Starting Rover...");

    generator
        .generate_assets(options)
        .map_err(DispatchFailure::from)?;

    write!(out, "{}", command.render_help())?;
    Ok(())
}
