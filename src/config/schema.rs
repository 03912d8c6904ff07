//! Option schema and compiled-in defaults.
//!
//! This module provides:
//! - [`RoverOptions`], the single record every resolver writes into
//! - [`OPTIONS`], one [`OptionSpec`] per field tying it to its environment
//!   suffix, its command-line flag, and its help text
//! - Per-field access through [`OptionId`] so resolvers can walk the schema
//!   instead of listing fields by hand

use serde::Serialize;

/// Prefix shared by every environment variable rover reads.
pub const ENV_PREFIX: &str = "ROVER_";

/// Separator for list values supplied through the environment or a flag.
pub const LIST_DELIMITER: char = ',';

/// Identifies one configurable setting.
///
/// Variant order matches [`OPTIONS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionId {
    Name,
    ZipFileName,
    WorkingDir,
    ShowSensitive,
    GenImage,
    Listener,
    Standalone,
    PlanPath,
    PlanJsonPath,
    TfPath,
    TfWorkspace,
    TfVarFiles,
    TfVars,
    TfBackendConfigs,
    TfcHostname,
    TfcOrgName,
    TfcWorkspaceName,
    TfcNewRun,
}

impl OptionId {
    /// Schema entry for this setting.
    pub fn spec(self) -> &'static OptionSpec {
        &OPTIONS[self as usize]
    }

    /// Full environment variable name, e.g. `ROVER_TF_VARS`.
    pub fn env_var(self) -> String {
        format!("{}{}", ENV_PREFIX, self.spec().env_suffix)
    }

    /// Long flag name without the leading dashes.
    pub fn flag(self) -> &'static str {
        self.spec().long
    }
}

/// Logical grouping used for `--help` headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionGroup {
    General,
    Plan,
    Terraform,
    Remote,
}

impl OptionGroup {
    pub fn heading(self) -> &'static str {
        match self {
            OptionGroup::General => "General",
            OptionGroup::Plan => "Plan",
            OptionGroup::Terraform => "Terraform",
            OptionGroup::Remote => "Terraform Cloud/Enterprise",
        }
    }
}

/// Semantic type of a setting, which drives coercion in every resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Str,
    Bool,
    List,
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionKind::Str => write!(f, "string"),
            OptionKind::Bool => write!(f, "bool"),
            OptionKind::List => write!(f, "comma-separated list"),
        }
    }
}

/// Static description of one setting.
#[derive(Debug)]
pub struct OptionSpec {
    pub id: OptionId,
    pub kind: OptionKind,
    /// Appended to [`ENV_PREFIX`] to form the variable name.
    pub env_suffix: &'static str,
    pub long: &'static str,
    pub short: Option<char>,
    pub help: &'static str,
    pub group: OptionGroup,
}

const fn spec(
    id: OptionId,
    kind: OptionKind,
    env_suffix: &'static str,
    long: &'static str,
    short: Option<char>,
    help: &'static str,
    group: OptionGroup,
) -> OptionSpec {
    OptionSpec {
        id,
        kind,
        env_suffix,
        long,
        short,
        help,
        group,
    }
}

use OptionGroup::{General, Plan, Remote, Terraform};
use OptionKind::{Bool, List, Str};

/// Every setting rover accepts.
///
/// `ROVER_PLAN_JSON` addresses the binary plan path; the name is kept for
/// compatibility with existing deployments.
#[rustfmt::skip]
pub static OPTIONS: &[OptionSpec] = &[
    spec(OptionId::Name, Str, "NAME", "name", Some('n'), "Configuration name", General),
    spec(OptionId::ZipFileName, Str, "ZIP_FILE_NAME", "zip-file", Some('z'), "Standalone zip file name", General),
    spec(OptionId::WorkingDir, Str, "WORKING_DIRECTORY", "working-dir", Some('w'), "Path to Terraform configuration", General),
    spec(OptionId::ShowSensitive, Bool, "SHOW_SENSITIVE", "show-sensitive", Some('s'), "Display sensitive values", General),
    spec(OptionId::GenImage, Bool, "GEN_IMAGE", "gen-image", Some('g'), "Generate graph image", General),
    spec(OptionId::Listener, Str, "LISTENER", "listener", Some('l'), "Address for the visualization server (host:port)", General),
    spec(OptionId::Standalone, Bool, "STANDALONE", "standalone", None, "Generate standalone HTML files", General),
    spec(OptionId::PlanPath, Str, "PLAN_JSON", "plan-path", Some('p'), "Plan file path", Plan),
    spec(OptionId::PlanJsonPath, Str, "PLAN_JSON_PATH", "plan-json-path", Some('j'), "Plan JSON file path", Plan),
    spec(OptionId::TfPath, Str, "TF_PATH", "tf-path", None, "Path to Terraform binary", Terraform),
    spec(OptionId::TfWorkspace, Str, "TF_WORKSPACE", "tf-workspace", None, "Terraform workspace name", Terraform),
    spec(OptionId::TfVarFiles, List, "TF_VAR_FILES", "tf-var-files", None, "Path to *.tfvars files", Terraform),
    spec(OptionId::TfVars, List, "TF_VARS", "tf-vars", None, "Terraform variable (key=value)", Terraform),
    spec(OptionId::TfBackendConfigs, List, "TF_BACKEND_CONFIGS", "tf-backend-configs", None, "Path to *.tfbackend files", Terraform),
    spec(OptionId::TfcHostname, Str, "TFC_HOSTNAME", "tfc-hostname", None, "Terraform Cloud/Enterprise Hostname", Remote),
    spec(OptionId::TfcOrgName, Str, "TFC_ORG_NAME", "tfc-org", None, "Terraform Cloud Organization name", Remote),
    spec(OptionId::TfcWorkspaceName, Str, "TFC_WORKSPACE_NAME", "tfc-workspace", None, "Terraform Cloud Workspace name", Remote),
    spec(OptionId::TfcNewRun, Bool, "TFC_NEW_RUN", "tfc-run", None, "Create new Terraform Cloud run", Remote),
];

/// A setting's value, detached from the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Str(String),
    Bool(bool),
    List(Vec<String>),
}

impl std::fmt::Display for OptionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionValue::Str(s) => write!(f, "{}", s),
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::List(items) => write!(f, "{}", items.join(",")),
        }
    }
}

/// Mutable borrow of one field of [`RoverOptions`].
#[derive(Debug)]
pub enum Slot<'a> {
    Str(&'a mut String),
    Bool(&'a mut bool),
    List(&'a mut Vec<String>),
}

/// Fully typed runtime configuration.
///
/// Created once per invocation by [`RoverOptions::default`], then overlaid by
/// the environment and command-line resolvers in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoverOptions {
    // General
    pub name: String,
    pub zip_file_name: String,
    pub working_dir: String,
    pub show_sensitive: bool,
    pub gen_image: bool,
    pub listener: String,
    pub standalone: bool,

    // Plan
    pub plan_path: String,
    pub plan_json_path: String,

    // Terraform
    pub tf_path: String,
    pub tf_workspace: String,
    pub tf_var_files: Vec<String>,
    pub tf_vars: Vec<String>,
    pub tf_backend_configs: Vec<String>,

    // Terraform Cloud / Enterprise
    pub tfc_hostname: String,
    pub tfc_org_name: String,
    pub tfc_workspace_name: String,
    pub tfc_new_run: bool,
}

impl Default for RoverOptions {
    fn default() -> Self {
        Self {
            name: "rover".to_string(),
            zip_file_name: "rover".to_string(),
            working_dir: ".".to_string(),
            show_sensitive: false,
            gen_image: false,
            listener: "0.0.0.0:9000".to_string(),
            standalone: false,
            plan_path: String::new(),
            plan_json_path: String::new(),
            tf_path: "/bin/terraform".to_string(),
            tf_workspace: String::new(),
            tf_var_files: Vec::new(),
            tf_vars: Vec::new(),
            tf_backend_configs: Vec::new(),
            tfc_hostname: "app.terraform.io".to_string(),
            tfc_org_name: String::new(),
            tfc_workspace_name: String::new(),
            tfc_new_run: false,
        }
    }
}

impl RoverOptions {
    /// Current value of a field.
    pub fn value(&self, id: OptionId) -> OptionValue {
        match self.slot(id) {
            SlotRef::Str(s) => OptionValue::Str(s.clone()),
            SlotRef::Bool(b) => OptionValue::Bool(*b),
            SlotRef::List(items) => OptionValue::List(items.clone()),
        }
    }

    /// Mutable access to a field, typed by its kind.
    pub fn slot_mut(&mut self, id: OptionId) -> Slot<'_> {
        match id {
            OptionId::Name => Slot::Str(&mut self.name),
            OptionId::ZipFileName => Slot::Str(&mut self.zip_file_name),
            OptionId::WorkingDir => Slot::Str(&mut self.working_dir),
            OptionId::ShowSensitive => Slot::Bool(&mut self.show_sensitive),
            OptionId::GenImage => Slot::Bool(&mut self.gen_image),
            OptionId::Listener => Slot::Str(&mut self.listener),
            OptionId::Standalone => Slot::Bool(&mut self.standalone),
            OptionId::PlanPath => Slot::Str(&mut self.plan_path),
            OptionId::PlanJsonPath => Slot::Str(&mut self.plan_json_path),
            OptionId::TfPath => Slot::Str(&mut self.tf_path),
            OptionId::TfWorkspace => Slot::Str(&mut self.tf_workspace),
            OptionId::TfVarFiles => Slot::List(&mut self.tf_var_files),
            OptionId::TfVars => Slot::List(&mut self.tf_vars),
            OptionId::TfBackendConfigs => Slot::List(&mut self.tf_backend_configs),
            OptionId::TfcHostname => Slot::Str(&mut self.tfc_hostname),
            OptionId::TfcOrgName => Slot::Str(&mut self.tfc_org_name),
            OptionId::TfcWorkspaceName => Slot::Str(&mut self.tfc_workspace_name),
            OptionId::TfcNewRun => Slot::Bool(&mut self.tfc_new_run),
        }
    }

    fn slot(&self, id: OptionId) -> SlotRef<'_> {
        match id {
            OptionId::Name => SlotRef::Str(&self.name),
            OptionId::ZipFileName => SlotRef::Str(&self.zip_file_name),
            OptionId::WorkingDir => SlotRef::Str(&self.working_dir),
            OptionId::ShowSensitive => SlotRef::Bool(&self.show_sensitive),
            OptionId::GenImage => SlotRef::Bool(&self.gen_image),
            OptionId::Listener => SlotRef::Str(&self.listener),
            OptionId::Standalone => SlotRef::Bool(&self.standalone),
            OptionId::PlanPath => SlotRef::Str(&self.plan_path),
            OptionId::PlanJsonPath => SlotRef::Str(&self.plan_json_path),
            OptionId::TfPath => SlotRef::Str(&self.tf_path),
            OptionId::TfWorkspace => SlotRef::Str(&self.tf_workspace),
            OptionId::TfVarFiles => SlotRef::List(&self.tf_var_files),
            OptionId::TfVars => SlotRef::List(&self.tf_vars),
            OptionId::TfBackendConfigs => SlotRef::List(&self.tf_backend_configs),
            OptionId::TfcHostname => SlotRef::Str(&self.tfc_hostname),
            OptionId::TfcOrgName => SlotRef::Str(&self.tfc_org_name),
            OptionId::TfcWorkspaceName => SlotRef::Str(&self.tfc_workspace_name),
            OptionId::TfcNewRun => SlotRef::Bool(&self.tfc_new_run),
        }
    }
}

enum SlotRef<'a> {
    Str(&'a String),
    Bool(&'a bool),
    List(&'a Vec<String>),
}

/// Parse a boolean the way rover has always accepted them.
///
/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and their false
/// counterparts. Anything else (including `yes`) is rejected.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Split a delimited list, keeping order and duplicates.
pub fn split_list(s: &str) -> Vec<String> {
    s.split(LIST_DELIMITER).map(str::to_string).collect()
}
