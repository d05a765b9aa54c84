use std::fmt;

use super::{
    Configs,
    loaders::environment::{optional_env, parse_env_or},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Text => write!(f, "text"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LookupConfig {
    /// Location of the lookup document, see [`super::loaders::DocumentSource`].
    pub input: Option<String>,
    /// Identifier quoted in lookup errors.
    pub id: String,
    pub output_format: OutputFormat,
}

#[async_trait::async_trait]
impl Configs for LookupConfig {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(LookupConfig {
            input: optional_env("TAGS_LOOKUP_INPUT"),
            id: optional_env("TAGS_LOOKUP_ID").unwrap_or_default(),
            output_format: parse_env_or("TAGS_OUTPUT_FORMAT", OutputFormat::Json)?,
        })
    }
}
