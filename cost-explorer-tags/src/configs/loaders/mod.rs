use std::fmt;

pub mod aws_parameter_store;
pub mod aws_secrets;
pub mod environment;
pub mod file;

/// Where a lookup document is read from:
///
/// - `string://<JSON>` or a bare value: the value itself
/// - `file:///path/to/lookup.json`
/// - `aws_secrets://<SECRET_NAME>`
/// - `aws_parameter_store://<PARAMETER_NAME>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource<'a> {
    Inline(&'a str),
    File(&'a str),
    AwsSecret(&'a str),
    AwsParameter(&'a str),
}

impl<'a> DocumentSource<'a> {
    pub fn parse(input: &'a str) -> Self {
        if let Some(content) = input.strip_prefix("string://") {
            Self::Inline(content)
        } else if let Some(path) = input.strip_prefix("file://") {
            Self::File(path)
        } else if let Some(secret_name) = input.strip_prefix("aws_secrets://") {
            Self::AwsSecret(secret_name)
        } else if let Some(param_name) = input.strip_prefix("aws_parameter_store://") {
            Self::AwsParameter(param_name)
        } else {
            Self::Inline(input)
        }
    }
}

impl fmt::Display for DocumentSource<'_> {
    // Inline content is not echoed, it may carry anything.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline(_) => write!(f, "inline document"),
            Self::File(path) => write!(f, "file '{path}'"),
            Self::AwsSecret(name) => write!(f, "secret '{name}'"),
            Self::AwsParameter(name) => write!(f, "parameter '{name}'"),
        }
    }
}

pub async fn load(input: &str) -> Result<String, String> {
    match DocumentSource::parse(input) {
        DocumentSource::Inline(content) => Ok(content.to_string()),
        DocumentSource::File(path) => file::load(path),
        DocumentSource::AwsSecret(secret_name) => aws_secrets::load(secret_name).await,
        DocumentSource::AwsParameter(param_name) => aws_parameter_store::load(param_name).await,
    }
}
