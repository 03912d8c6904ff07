//! Environment overlay for `ROVER_*` variables.
//!
//! Each setting is addressed by [`ENV_PREFIX`](super::schema::ENV_PREFIX)
//! followed by its schema suffix. Present, non-empty variables are coerced to
//! the field's kind and written over the current value; everything else is
//! left alone. A variable that is set but not valid UTF-8 is an error.

use std::env::VarError;

use crate::config::schema::{OPTIONS, OptionId, OptionKind, RoverOptions, Slot, parse_bool, split_list};

/// An environment variable whose value does not fit its field's type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value {value:?} for environment variable {var}: expected {expected}")]
pub struct ConfigParseError {
    pub var: String,
    pub value: String,
    pub expected: OptionKind,
}

/// Overlay environment values onto `options` using `lookup` to read variables.
///
/// Returns the settings that were overridden, in schema order. Stops at the
/// first value that cannot be coerced.
///
/// `lookup` has the shape of [`std::env::var`]: `NotPresent` leaves the field
/// alone, `NotUnicode` is reported against the variable.
pub fn apply_env<F>(options: &mut RoverOptions, lookup: F) -> Result<Vec<OptionId>, ConfigParseError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let mut applied = Vec::new();

    for spec in OPTIONS {
        let var = spec.id.env_var();
        let raw = match lookup(&var) {
            Ok(raw) => raw,
            Err(VarError::NotPresent) => continue,
            Err(VarError::NotUnicode(raw)) => {
                return Err(ConfigParseError {
                    value: raw.to_string_lossy().into_owned(),
                    var,
                    expected: spec.kind,
                });
            }
        };
        if raw.is_empty() {
            continue;
        }

        match options.slot_mut(spec.id) {
            Slot::Str(field) => *field = raw,
            Slot::Bool(field) => {
                let Some(value) = parse_bool(&raw) else {
                    return Err(ConfigParseError {
                        var,
                        value: raw,
                        expected: spec.kind,
                    });
                };
                *field = value;
            }
            Slot::List(field) => *field = split_list(&raw),
        }

        tracing::debug!(var = %var, "environment override applied");
        applied.push(spec.id);
    }

    Ok(applied)
}

/// Read a variable from the process environment.
pub fn from_process(name: &str) -> Result<String, VarError> {
    std::env::var(name)
}

/// Overlay the current process environment.
pub fn apply_process_env(options: &mut RoverOptions) -> Result<Vec<OptionId>, ConfigParseError> {
    apply_env(options, from_process)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Result<String, VarError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned().ok_or(VarError::NotPresent)
    }

    #[test]
    fn test_no_variables_leaves_defaults() {
        let mut options = RoverOptions::default();
        let applied = apply_env(&mut options, lookup_from(&[])).unwrap();
        assert!(applied.is_empty());
        assert_eq!(options, RoverOptions::default());
    }

    #[test]
    fn test_string_bool_and_list_coercion() {
        let mut options = RoverOptions::default();
        let applied = apply_env(
            &mut options,
            lookup_from(&[
                ("ROVER_NAME", "from-env"),
                ("ROVER_SHOW_SENSITIVE", "true"),
                ("ROVER_TFC_NEW_RUN", "1"),
                ("ROVER_TF_VAR_FILES", "b.tfvars,a.tfvars,b.tfvars"),
            ]),
        )
        .unwrap();

        assert_eq!(options.name, "from-env");
        assert!(options.show_sensitive);
        assert!(options.tfc_new_run);
        assert_eq!(options.tf_var_files, vec!["b.tfvars", "a.tfvars", "b.tfvars"]);
        assert_eq!(
            applied,
            vec![
                OptionId::Name,
                OptionId::ShowSensitive,
                OptionId::TfVarFiles,
                OptionId::TfcNewRun
            ]
        );
    }

    #[test]
    fn test_false_value_overrides() {
        let mut options = RoverOptions {
            gen_image: true,
            ..RoverOptions::default()
        };
        apply_env(&mut options, lookup_from(&[("ROVER_GEN_IMAGE", "F")])).unwrap();
        assert!(!options.gen_image);
    }

    #[test]
    fn test_empty_value_is_ignored() {
        let mut options = RoverOptions::default();
        let applied = apply_env(
            &mut options,
            lookup_from(&[("ROVER_TF_PATH", ""), ("ROVER_STANDALONE", "")]),
        )
        .unwrap();
        assert!(applied.is_empty());
        assert_eq!(options.tf_path, "/bin/terraform");
    }

    #[test]
    fn test_plan_path_uses_plan_json_suffix() {
        let mut options = RoverOptions::default();
        apply_env(
            &mut options,
            lookup_from(&[("ROVER_PLAN_JSON", "plan.out"), ("ROVER_PLAN_JSON_PATH", "plan.json")]),
        )
        .unwrap();
        assert_eq!(options.plan_path, "plan.out");
        assert_eq!(options.plan_json_path, "plan.json");
    }

    #[test]
    fn test_unprefixed_variables_are_ignored() {
        let mut options = RoverOptions::default();
        apply_env(&mut options, lookup_from(&[("NAME", "nope"), ("TF_PATH", "nope")])).unwrap();
        assert_eq!(options, RoverOptions::default());
    }

    #[test]
    fn test_invalid_bool_is_parse_error() {
        let mut options = RoverOptions::default();
        let err = apply_env(&mut options, lookup_from(&[("ROVER_SHOW_SENSITIVE", "maybe")]))
            .unwrap_err();
        assert_eq!(err.var, "ROVER_SHOW_SENSITIVE");
        assert_eq!(err.value, "maybe");
        assert_eq!(err.expected, OptionKind::Bool);
        assert!(err.to_string().contains("ROVER_SHOW_SENSITIVE"));
        assert!(err.to_string().contains("maybe"));
    }

    #[test]
    #[serial]
    fn test_apply_process_env() {
        // SAFETY: serialized with every other test touching the process environment.
        unsafe { std::env::set_var("ROVER_TF_WORKSPACE", "staging") };

        let mut options = RoverOptions::default();
        let result = apply_process_env(&mut options);

        unsafe { std::env::remove_var("ROVER_TF_WORKSPACE") };

        assert!(result.unwrap().contains(&OptionId::TfWorkspace));
        assert_eq!(options.tf_workspace, "staging");
    }

    #[test]
    fn test_non_unicode_value_is_parse_error() {
        use std::ffi::OsString;

        let mut options = RoverOptions::default();
        let lookup = |name: &str| match name {
            "ROVER_WORKING_DIRECTORY" => Err(VarError::NotUnicode(OsString::from("ignored"))),
            _ => Err(VarError::NotPresent),
        };
        let err = apply_env(&mut options, lookup).unwrap_err();
        assert_eq!(err.var, "ROVER_WORKING_DIRECTORY");
        assert_eq!(err.expected, OptionKind::Str);
        assert_eq!(options.working_dir, ".");
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_non_unicode_process_variable_is_reported() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        // SAFETY: serialized with every other test touching the process environment.
        unsafe {
            std::env::set_var("ROVER_NAME", OsStr::from_bytes(b"de\xffmo"));
            std::env::set_var("ROVER_SHOW_SENSITIVE", OsStr::from_bytes(b"tr\xffue"));
        }

        let mut options = RoverOptions::default();
        let result = apply_process_env(&mut options);

        unsafe {
            std::env::remove_var("ROVER_NAME");
            std::env::remove_var("ROVER_SHOW_SENSITIVE");
        }

        let err = result.unwrap_err();
        assert_eq!(err.var, "ROVER_NAME");
        assert_eq!(err.value, "de\u{fffd}mo");
        assert_eq!(options.name, "rover");
    }
}
