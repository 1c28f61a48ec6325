use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AliasError, Result};

/// Default permission prefix; an alias named `heal` requires `alias.heal`
pub const DEFAULT_PERMISSION_PREFIX: &str = "alias";

/// Invocation channels a command accepts
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AllowedSource {
    Player,
    Console,
    #[default]
    Both,
}

impl AllowedSource {
    /// Whether a sender on the given channel may invoke the command
    pub fn permits(&self, is_console: bool) -> bool {
        match self {
            AllowedSource::Player => !is_console,
            AllowedSource::Console => is_console,
            AllowedSource::Both => true,
        }
    }
}

/// One typed argument token, as parsed by the host from raw input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationArg {
    /// Raw textual form
    pub raw: String,

    /// Whether the host classified the token as a string (as opposed to a number or boolean)
    pub is_string: bool,
}

impl InvocationArg {
    pub fn new(raw: impl Into<String>, is_string: bool) -> Self {
        Self {
            raw: raw.into(),
            is_string,
        }
    }

    /// A string-typed argument
    pub fn string(raw: impl Into<String>) -> Self {
        Self::new(raw, true)
    }

    /// A non-string argument (number, boolean)
    pub fn value(raw: impl ToString) -> Self {
        Self::new(raw.to_string(), false)
    }
}

/// Result of executing a host command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Success,
    /// The invocation did not match the command's expected arguments
    ShowUsage,
    Error(String),
}

impl CommandOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CommandOutcome::Success)
    }
}

/// Serialized shape of one alias in the definition source
///
/// Every field is optional here so that a missing name or command list surfaces
/// as [`AliasError::InvalidDefinition`] instead of a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AliasRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commands: Option<Vec<String>>,

    /// One allowed-value set per positional argument; `null` accepts any value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_inputs: Option<Vec<Option<Vec<String>>>>,
}

impl AliasRecord {
    pub fn new(name: impl Into<String>, commands: Vec<String>) -> Self {
        Self {
            name: Some(name.into()),
            commands: Some(commands),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// The aliases written when no definition source exists yet
pub fn default_records() -> Vec<AliasRecord> {
    vec![
        AliasRecord::new("aliastest", vec!["broadcast hi".to_string()])
            .with_description("Just a test"),
        AliasRecord::new("aliastest2", vec!["broadcast hi2".to_string()])
            .with_description("Just a test"),
    ]
}

/// A validated alias
///
/// Built once per record during a load pass and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasDefinition {
    name: String,
    description: Option<String>,
    usage: Option<String>,
    commands: Vec<String>,
    valid_inputs: Option<Vec<Option<Vec<String>>>>,
    permission: String,
    allowed_source: AllowedSource,
}

impl AliasDefinition {
    /// Create a definition, rejecting an empty name or an empty template list
    pub fn new(name: impl Into<String>, commands: Vec<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AliasError::InvalidDefinition(
                "Name of alias is empty".to_string(),
            ));
        }
        if commands.is_empty() {
            return Err(AliasError::InvalidDefinition(format!(
                "Commands of alias '{}' is null or empty",
                name
            )));
        }

        Ok(Self {
            permission: format!("{}.{}", DEFAULT_PERMISSION_PREFIX, name),
            name,
            description: None,
            usage: None,
            commands,
            valid_inputs: None,
            allowed_source: AllowedSource::Both,
        })
    }

    /// Build a definition from one raw record of the definition source
    ///
    /// Error messages carry the raw record so the operator can find it.
    pub fn from_record(raw: &serde_json::Value, permission_prefix: &str) -> Result<Self> {
        let record: AliasRecord = serde_json::from_value(raw.clone()).map_err(|e| {
            AliasError::SourceRead(format!("Malformed alias record ({}). Alias:\n{}", e, raw))
        })?;

        let name = match record.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => {
                return Err(AliasError::InvalidDefinition(format!(
                    "Name of alias is null or invalid. Alias:\n{}",
                    raw
                )))
            }
        };

        let commands = record.commands.unwrap_or_default();
        if commands.is_empty() {
            return Err(AliasError::InvalidDefinition(format!(
                "Commands of alias '{}' is null or empty. Alias:\n{}",
                name, raw
            )));
        }

        let mut definition = Self::new(name, commands)?.with_permission_prefix(permission_prefix);
        definition.description = record.description;
        definition.usage = record.usage;
        definition.valid_inputs = record.valid_inputs;
        Ok(definition)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    /// Restrict positional arguments; `None` entries accept any value
    pub fn with_valid_inputs(mut self, valid_inputs: Vec<Option<Vec<String>>>) -> Self {
        self.valid_inputs = Some(valid_inputs);
        self
    }

    pub fn with_permission_prefix(mut self, prefix: &str) -> Self {
        self.permission = format!("{}.{}", prefix, self.name);
        self
    }

    pub fn with_allowed_source(mut self, source: AllowedSource) -> Self {
        self.allowed_source = source;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn usage(&self) -> Option<&str> {
        self.usage.as_deref()
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn valid_inputs(&self) -> Option<&[Option<Vec<String>>]> {
        self.valid_inputs.as_deref()
    }

    pub fn permission(&self) -> &str {
        &self.permission
    }

    pub fn allowed_source(&self) -> AllowedSource {
        self.allowed_source
    }

    /// Case-insensitive name comparison, as used for uniqueness
    pub fn same_name(&self, other: &str) -> bool {
        self.name.eq_ignore_ascii_case(other)
    }

    /// The record this definition would serialize back to
    pub fn to_record(&self) -> AliasRecord {
        AliasRecord {
            name: Some(self.name.clone()),
            description: self.description.clone(),
            usage: self.usage.clone(),
            commands: Some(self.commands.clone()),
            valid_inputs: self.valid_inputs.clone(),
        }
    }
}

impl fmt::Display for AliasDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: {}, Description: {}, ValidInputs: {:?}, Usage: {}, Commands: {:?}",
            self.name,
            self.description.as_deref().unwrap_or(""),
            self.valid_inputs,
            self.usage.as_deref().unwrap_or(""),
            self.commands
        )
    }
}
