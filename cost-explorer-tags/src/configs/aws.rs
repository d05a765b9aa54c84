use super::{
    Configs,
    loaders::environment::{env_or, optional_env},
};

/// Cost Explorer is served from us-east-1 only.
const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Clone, Default)]
pub struct AwsClientConfig {
    pub region: Option<String>,
    pub profile: Option<String>,
    /// Endpoint for every AWS service the tool calls, STS included.
    pub endpoint_url: Option<String>,
    /// Endpoint for Cost Explorer only. Takes precedence over `endpoint_url`
    /// for Cost Explorer and never affects STS.
    pub cost_explorer_endpoint_url: Option<String>,
    /// Skips the STS caller identity lookup when set.
    pub account_id: Option<String>,
}

#[async_trait::async_trait]
impl Configs for AwsClientConfig {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(AwsClientConfig {
            region: Some(env_or("AWS_REGION", DEFAULT_REGION)),
            profile: optional_env("AWS_PROFILE"),
            endpoint_url: optional_env("AWS_ENDPOINT"),
            cost_explorer_endpoint_url: optional_env("COST_EXPLORER_ENDPOINT"),
            account_id: optional_env("AWS_ACCOUNT_ID").filter(|id| !id.is_empty()),
        })
    }
}
