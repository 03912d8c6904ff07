//! CLI argument definitions for rover.
//!
//! Flags are registered from the option schema at runtime so that each
//! flag's default is the value already resolved from the environment. Only
//! flags actually present on the command line are written back.

use std::env::VarError;
use std::ffi::OsString;
use std::io::Write;

use clap::parser::ValueSource as ArgSource;
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::Result;
use crate::config::{
    LIST_DELIMITER, OPTIONS, OptionId, OptionSpec, OptionValue, Provenance, Resolution,
    RoverOptions, Slot, apply_env, env::from_process, schema::parse_bool, validate,
};
use crate::dispatch::{AssetGenerator, dispatch};

const ABOUT: &str = "Interactive Terraform visualization, State and configuration explorer";

/// Version string with the commit the binary was built from.
pub fn version() -> String {
    format!(
        "{} ({} {})",
        env!("CARGO_PKG_VERSION"),
        env!("ROVER_GIT_COMMIT"),
        env!("ROVER_BUILD_TIMESTAMP")
    )
}

/// Build the `rover` command with one flag per setting.
///
/// Defaults shown in `--help` are taken from `options`, which should already
/// carry the environment overlay.
pub fn build_command(options: &RoverOptions) -> Command {
    OPTIONS.iter().fold(
        Command::new("rover").about(ABOUT).version(version()),
        |command, spec| command.arg(flag(spec, &options.value(spec.id))),
    )
}

fn flag(spec: &OptionSpec, current: &OptionValue) -> Arg {
    let mut arg = Arg::new(spec.long)
        .long(spec.long)
        .help(spec.help)
        .help_heading(spec.group.heading());
    if let Some(short) = spec.short {
        arg = arg.short(short);
    }

    match current {
        OptionValue::Str(value) => {
            arg = arg.action(ArgAction::Set).value_name("STRING");
            if !value.is_empty() {
                arg = arg.default_value(value.clone());
            }
        }
        // `--flag` alone means true; `--flag=false` turns off an environment value.
        OptionValue::Bool(value) => {
            arg = arg
                .action(ArgAction::Set)
                .value_name("BOOL")
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true")
                .value_parser(parse_flag_bool)
                .default_value(if *value { "true" } else { "false" });
        }
        OptionValue::List(items) => {
            arg = arg
                .action(ArgAction::Append)
                .value_name("VALUES")
                .value_delimiter(LIST_DELIMITER);
            if !items.is_empty() {
                arg = arg.default_values(items.clone());
            }
        }
    }
    arg
}

fn parse_flag_bool(s: &str) -> std::result::Result<bool, String> {
    parse_bool(s).ok_or_else(|| format!("invalid boolean {:?}", s))
}

/// Overlay the flags present on the command line onto `options`.
///
/// Flags that fell back to their default are skipped, leaving the
/// environment-resolved value in place. Returns the overridden settings.
pub fn apply_matches(options: &mut RoverOptions, matches: &ArgMatches) -> Vec<OptionId> {
    let mut applied = Vec::new();

    for spec in OPTIONS {
        if matches.value_source(spec.long) != Some(ArgSource::CommandLine) {
            continue;
        }

        match options.slot_mut(spec.id) {
            Slot::Str(field) => {
                if let Some(value) = matches.get_one::<String>(spec.long) {
                    *field = value.clone();
                }
            }
            Slot::Bool(field) => {
                if let Some(value) = matches.get_one::<bool>(spec.long) {
                    *field = *value;
                }
            }
            Slot::List(field) => {
                let values: Vec<String> = matches
                    .get_many::<String>(spec.long)
                    .map(|values| values.cloned().collect())
                    .unwrap_or_default();
                // `--tf-var-files=` clears the list
                *field = match values.as_slice() {
                    [only] if only.is_empty() => Vec::new(),
                    _ => values,
                };
            }
        }

        tracing::debug!(flag = spec.long, "command-line override applied");
        applied.push(spec.id);
    }

    applied
}

/// Resolve defaults, then the environment read through `lookup`, then `args`.
///
/// Returns the resolution together with the command, which the dispatcher
/// needs to print help.
pub fn resolve<I, T, F>(args: I, lookup: F) -> Result<(Resolution, Command)>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    F: Fn(&str) -> std::result::Result<String, VarError>,
{
    let mut options = RoverOptions::default();
    let mut provenance = Provenance::new();

    let from_env = apply_env(&mut options, lookup)?;
    provenance.record_env(&from_env);

    let mut command = build_command(&options);
    let matches = command.try_get_matches_from_mut(args)?;
    let from_cli = apply_matches(&mut options, &matches);
    provenance.record_cli(&from_cli);

    let resolution = Resolution {
        options,
        provenance,
    };
    resolution.trace();
    Ok((resolution, command))
}

/// Resolve, validate, and dispatch one invocation.
pub fn execute<I, T, F, W>(
    args: I,
    lookup: F,
    generator: &dyn AssetGenerator,
    out: &mut W,
) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    F: Fn(&str) -> std::result::Result<String, VarError>,
    W: Write,
{
    let (resolution, mut command) = resolve(args, lookup)?;
    validate(&resolution.options)?;
    dispatch(&resolution.options, generator, &mut command, out)
}

/// [`execute`] against the process arguments and environment.
pub fn run<W: Write>(generator: &dyn AssetGenerator, out: &mut W) -> Result<()> {
    execute(std::env::args_os(), from_process, generator, out)
}
