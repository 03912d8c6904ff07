//! Provenance tracking for resolved options.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags explicitly supplied on the command line
//! 2. `ROVER_*` environment variables
//! 3. Built-in defaults
//!
//! The resolvers write into a single [`RoverOptions`]; this module records
//! which layer produced each field's final value.

use std::collections::BTreeMap;

use crate::config::schema::{OPTIONS, OptionId, RoverOptions};

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Built-in default value
    Default,
    /// Value from environment variable
    EnvVar(String),
    /// Value from CLI flag
    CliFlag,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::Default => write!(f, "default"),
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::CliFlag => write!(f, "cli"),
        }
    }
}

static UNSET: ValueSource = ValueSource::Default;

/// Source of every field in a [`RoverOptions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    sources: BTreeMap<OptionId, ValueSource>,
}

impl Default for Provenance {
    fn default() -> Self {
        Self::new()
    }
}

impl Provenance {
    /// Every field attributed to its default.
    pub fn new() -> Self {
        Self {
            sources: OPTIONS
                .iter()
                .map(|spec| (spec.id, ValueSource::Default))
                .collect(),
        }
    }

    pub fn source(&self, id: OptionId) -> &ValueSource {
        self.sources.get(&id).unwrap_or(&UNSET)
    }

    /// Attribute `ids` to their environment variables.
    pub fn record_env(&mut self, ids: &[OptionId]) {
        for &id in ids {
            self.sources.insert(id, ValueSource::EnvVar(id.env_var()));
        }
    }

    /// Attribute `ids` to the command line.
    pub fn record_cli(&mut self, ids: &[OptionId]) {
        for &id in ids {
            self.sources.insert(id, ValueSource::CliFlag);
        }
    }

    /// Fields whose value did not come from the defaults, in schema order.
    pub fn overridden(&self) -> impl Iterator<Item = (OptionId, &ValueSource)> {
        self.sources
            .iter()
            .filter(|(_, source)| **source != ValueSource::Default)
            .map(|(id, source)| (*id, source))
    }
}

/// Fully resolved options together with their provenance.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub options: RoverOptions,
    pub provenance: Provenance,
}

impl Resolution {
    /// Emit the overridden fields and the final record at debug level.
    pub fn trace(&self) {
        for (id, source) in self.provenance.overridden() {
            tracing::debug!(
                option = id.flag(),
                source = %source,
                value = %self.options.value(id),
                "option overridden"
            );
        }

        match serde_json::to_string(&self.options) {
            Ok(json) => tracing::debug!(options = %json, "resolved configuration"),
            Err(e) => tracing::warn!("could not serialize resolved configuration: {}", e),
        }
    }
}
