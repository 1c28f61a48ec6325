use thiserror::Error;

/// Errors that can occur in the alias engine
#[derive(Error, Debug)]
pub enum AliasError {
    #[error("Invalid alias definition: {0}")]
    InvalidDefinition(String),

    #[error("Duplicate alias name: {0}")]
    DuplicateName(String),

    #[error("Failed to read alias definitions: {0}")]
    SourceRead(String),

    #[error("Host registration failed: {0}")]
    HostRegistration(String),

    #[error("Command dispatch failed: {0}")]
    Dispatch(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl AliasError {
    /// Stable label for operator-facing messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidDefinition(_) => "invalid-definition",
            Self::DuplicateName(_) => "duplicate-name",
            Self::SourceRead(_) | Self::Serialization(_) | Self::Yaml(_) => "source-read",
            Self::HostRegistration(_) => "host-registration",
            Self::Dispatch(_) => "dispatch",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Regex(_) => "internal",
        }
    }
}

pub type Result<T> = std::result::Result<T, AliasError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AliasError::DuplicateName("heal".to_string());
        assert_eq!(err.to_string(), "Duplicate alias name: heal");
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            AliasError::InvalidDefinition("x".into()).kind(),
            "invalid-definition"
        );
        assert_eq!(AliasError::SourceRead("x".into()).kind(), "source-read");

        let json_err = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        assert_eq!(AliasError::from(json_err).kind(), "source-read");
    }
}
