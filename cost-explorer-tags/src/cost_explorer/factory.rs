use std::sync::Arc;

use anyhow::{Result as AnyResult, anyhow};
use aws_config::{BehaviorVersion, SdkConfig};
use aws_types::region::Region;
use tracing::{debug, info};

use crate::{
    configs::AwsClientConfig,
    cost_explorer::{AwsClient, adapters::SdkCostExplorer},
    domain::AccountId,
};

pub struct AwsClientFactory {
    config: AwsClientConfig,
}

impl AwsClientFactory {
    pub fn new(config: AwsClientConfig) -> Self {
        Self { config }
    }

    pub async fn create(&self) -> AnyResult<AwsClient> {
        let shared_config = self.load_sdk_config().await;
        let cost_explorer = self.cost_explorer_client(&shared_config);
        let account_id = self.resolve_account_id(&shared_config).await?;

        info!(account_id = account_id.as_str(), "Cost Explorer client is ready");

        Ok(AwsClient::new(
            Arc::new(SdkCostExplorer::with_client(cost_explorer)),
            account_id,
        ))
    }

    async fn load_sdk_config(&self) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(profile) = &self.config.profile {
            loader = loader.profile_name(profile);
        }

        if let Some(region) = self.config.region.clone() {
            loader = loader.region(Region::new(region));
        }

        if let Some(endpoint_url) = &self.config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url.clone());
        }

        loader.load().await
    }

    /// `cost_explorer_endpoint_url` is applied here and not on the shared
    /// loader, so STS keeps its own endpoint.
    fn cost_explorer_client(&self, shared_config: &SdkConfig) -> aws_sdk_costexplorer::Client {
        let mut builder = aws_sdk_costexplorer::config::Builder::from(shared_config);

        if let Some(endpoint_url) = &self.config.cost_explorer_endpoint_url {
            debug!(
                endpoint_url = endpoint_url.as_str(),
                "Using Cost Explorer endpoint override"
            );
            builder = builder.endpoint_url(endpoint_url.clone());
        }

        aws_sdk_costexplorer::Client::from_conf(builder.build())
    }

    async fn resolve_account_id(&self, shared_config: &SdkConfig) -> AnyResult<AccountId> {
        if let Some(account_id) = &self.config.account_id {
            debug!("Using configured AWS account id");
            return Ok(AccountId::new(account_id.clone()));
        }

        let sts = aws_sdk_sts::Client::new(shared_config);
        let identity = sts.get_caller_identity().send().await.map_err(|e| {
            anyhow!(
                "Failed to resolve AWS account id: {}",
                aws_sdk_sts::error::DisplayErrorContext(&e.into_service_error())
            )
        })?;

        identity
            .account()
            .map(AccountId::new)
            .ok_or_else(|| anyhow!("Caller identity has no account id"))
    }
}
