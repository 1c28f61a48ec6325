//! Definition sources: where alias records are read from
//!
//! Sources return raw JSON values rather than typed records so that each record can
//! be validated individually and quoted verbatim in error messages.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use crate::error::{AliasError, Result};
use crate::types::{default_records, AliasRecord};

/// Text format of a definition source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Yaml,
}

impl SourceFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        match extension {
            "json" => Ok(SourceFormat::Json),
            "yaml" | "yml" => Ok(SourceFormat::Yaml),
            _ => Err(AliasError::SourceRead(format!(
                "Unsupported alias file format '{}'. Use .json, .yaml, or .yml",
                path.display()
            ))),
        }
    }

    /// Parse text into the ordered list of raw records
    pub fn parse(&self, content: &str) -> Result<Vec<Value>> {
        let document: Value = match self {
            SourceFormat::Json => serde_json::from_str(content)
                .map_err(|e| AliasError::SourceRead(format!("Invalid JSON: {}", e)))?,
            SourceFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| AliasError::SourceRead(format!("Invalid YAML: {}", e)))?,
        };

        match document {
            Value::Array(records) => Ok(records),
            other => Err(AliasError::SourceRead(format!(
                "Expected an array of aliases, found {}",
                value_kind(&other)
            ))),
        }
    }

    /// Render records in this format
    pub fn render(&self, records: &[AliasRecord]) -> Result<String> {
        match self {
            SourceFormat::Json => Ok(serde_json::to_string_pretty(records)?),
            SourceFormat::Yaml => Ok(serde_yaml::to_string(records)?),
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Where alias definitions come from
pub trait DefinitionSource: Send + Sync {
    /// Read the ordered list of raw alias records
    fn read_records(&self) -> Result<Vec<Value>>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

/// Alias definitions stored in a JSON or YAML file
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the bootstrap aliases if the file does not exist
    ///
    /// Returns whether a file was written.
    pub fn ensure_default(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        self.save(&default_records())?;
        info!(path = %self.path.display(), "Wrote default aliases");
        Ok(true)
    }

    /// Overwrite the file with the given records
    pub fn save(&self, records: &[AliasRecord]) -> Result<()> {
        let format = SourceFormat::from_path(&self.path)?;
        let content = format.render(records)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl DefinitionSource for FileSource {
    fn read_records(&self) -> Result<Vec<Value>> {
        let format = SourceFormat::from_path(&self.path)?;
        let content = fs::read_to_string(&self.path).map_err(|e| {
            AliasError::SourceRead(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))
        })?;
        format.parse(&content)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Alias definitions held as text in memory
#[derive(Debug, Clone)]
pub struct InlineSource {
    content: String,
    format: SourceFormat,
}

impl InlineSource {
    pub fn new(content: impl Into<String>, format: SourceFormat) -> Self {
        Self {
            content: content.into(),
            format,
        }
    }

    pub fn json(content: impl Into<String>) -> Self {
        Self::new(content, SourceFormat::Json)
    }

    pub fn yaml(content: impl Into<String>) -> Self {
        Self::new(content, SourceFormat::Yaml)
    }
}

impl DefinitionSource for InlineSource {
    fn read_records(&self) -> Result<Vec<Value>> {
        self.format.parse(&self.content)
    }

    fn describe(&self) -> String {
        format!("<inline {:?}>", self.format)
    }
}
