//! Consistency checks over a fully resolved [`RoverOptions`].
//!
//! Every rule runs; the error lists all violations so a user can fix their
//! invocation in one pass.

use std::net::{IpAddr, Ipv6Addr};

use crate::config::schema::{OptionId, RoverOptions};

/// One broken rule and the settings involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub options: Vec<OptionId>,
    pub message: String,
}

impl Violation {
    fn new(options: &[OptionId], message: impl Into<String>) -> Self {
        Self {
            options: options.to_vec(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let flags: Vec<String> = self
            .options
            .iter()
            .map(|id| format!("--{}", id.flag()))
            .collect();
        write!(f, "{}: {}", flags.join(", "), self.message)
    }
}

/// The merged configuration breaks one or more rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid configuration:{}", render(.violations))]
pub struct ConfigValidationError {
    pub violations: Vec<Violation>,
}

impl ConfigValidationError {
    /// Whether any violation involves `id`.
    pub fn mentions(&self, id: OptionId) -> bool {
        self.violations.iter().any(|v| v.options.contains(&id))
    }
}

fn render(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("\n  - {}", v))
        .collect()
}

/// Check `options` for individually illegal or mutually inconsistent values.
pub fn validate(options: &RoverOptions) -> Result<(), ConfigValidationError> {
    let mut violations = Vec::new();

    if !options.plan_path.is_empty() && !options.plan_json_path.is_empty() {
        violations.push(Violation::new(
            &[OptionId::PlanPath, OptionId::PlanJsonPath],
            "a plan file and a JSON plan file cannot both be supplied",
        ));
    }

    let required = [
        (OptionId::Name, &options.name),
        (OptionId::ZipFileName, &options.zip_file_name),
        (OptionId::WorkingDir, &options.working_dir),
        (OptionId::TfPath, &options.tf_path),
    ];
    for (id, value) in required {
        if value.trim().is_empty() {
            violations.push(Violation::new(&[id], "must not be empty"));
        }
    }

    if let Err(reason) = check_listener(&options.listener) {
        violations.push(Violation::new(
            &[OptionId::Listener],
            format!("invalid listen address {:?}: {}", options.listener, reason),
        ));
    }

    let paths = [
        (OptionId::TfVarFiles, &options.tf_var_files),
        (OptionId::TfBackendConfigs, &options.tf_backend_configs),
    ];
    for (id, entries) in paths {
        if entries.iter().any(|entry| entry.trim().is_empty()) {
            violations.push(Violation::new(&[id], "entries must not be empty"));
        }
    }

    for var in &options.tf_vars {
        let valid = var
            .split_once('=')
            .is_some_and(|(key, _)| !key.trim().is_empty());
        if !valid {
            violations.push(Violation::new(
                &[OptionId::TfVars],
                format!("{:?} is not of the form key=value", var),
            ));
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ConfigValidationError { violations })
    }
}

/// Accepts `host:port` where host is empty, an IPv4 address, a bracketed
/// IPv6 address, or a hostname.
fn check_listener(addr: &str) -> Result<(), String> {
    let Some((host, port)) = addr.rsplit_once(':') else {
        return Err("expected host:port".to_string());
    };

    if port.parse::<u16>().is_err() {
        return Err(format!("port {:?} is not a number between 0 and 65535", port));
    }

    if host.is_empty() {
        return Ok(());
    }

    if let Some(inner) = host.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
        return inner
            .parse::<Ipv6Addr>()
            .map(|_| ())
            .map_err(|_| format!("{:?} is not an IPv6 address", inner));
    }

    if host.contains(':') {
        return Err("IPv6 addresses must be enclosed in brackets".to_string());
    }

    if host.parse::<IpAddr>().is_ok() || is_hostname(host) {
        Ok(())
    } else {
        Err(format!("{:?} is not a valid host", host))
    }
}

fn is_hostname(host: &str) -> bool {
    host.len() <= 253
        && host.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}
