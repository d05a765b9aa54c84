use aws_config::{self, BehaviorVersion};
use aws_sdk_ssm::{self, error::DisplayErrorContext};
use tracing::debug;

pub async fn load(param_name: &str) -> Result<String, String> {
    debug!(parameter = param_name, "Loading lookup document from Parameter Store");

    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let client = aws_sdk_ssm::Client::new(&config);

    let result = client
        .get_parameter()
        .name(param_name)
        .with_decryption(true)
        .send()
        .await
        .map_err(|e| {
            format!(
                "Failed to get parameter '{param_name}': {}",
                DisplayErrorContext(&e.into_service_error())
            )
        })?;

    result
        .parameter()
        .and_then(|p| p.value())
        .map(|v| v.to_string())
        .ok_or_else(|| format!("Parameter '{param_name}' has no value"))
}
