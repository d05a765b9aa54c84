pub mod aws;
pub mod loaders;
pub mod lookup;

pub use aws::AwsClientConfig;
pub use lookup::{LookupConfig, OutputFormat};

#[async_trait::async_trait]
pub trait Configs: Sized {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>>;
}

#[derive(Debug, Clone)]
pub struct CostTagsConfig {
    pub aws_config: AwsClientConfig,
    pub lookup_config: LookupConfig,
}

#[async_trait::async_trait]
impl Configs for CostTagsConfig {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Self {
            aws_config: AwsClientConfig::load().await?,
            lookup_config: LookupConfig::load().await?,
        })
    }
}
