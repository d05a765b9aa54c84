use anyhow::{Result as AnyResult, anyhow};
use clap::Parser;
use dotenvy::dotenv;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::{
    configs::{Configs, CostTagsConfig, OutputFormat, loaders},
    cost_explorer::factory::AwsClientFactory,
    domain::TagsResult,
    lookup::lookup_tags,
    schema::parse_lookup,
};

#[derive(Parser, Debug, Default)]
#[command(version, about = "Look up AWS Cost Explorer tag values", long_about = None)]
pub struct Args {
    /// Lookup document location using URI schemes:
    ///
    /// - Direct value (default when not specified): '<JSON_STRING>'
    ///
    /// - String protocol: 'string://<JSON_STRING>'
    ///
    /// - File system: 'file:///path/to/lookup.json'
    ///
    /// - AWS Secrets Manager: 'aws_secrets://<SECRET_NAME>'
    ///
    /// - AWS Parameter Store: 'aws_parameter_store://<PARAMETER_NAME>'
    ///
    /// Falls back to TAGS_LOOKUP_INPUT.
    #[arg(long, short = 'i')]
    pub input: Option<String>,

    /// Identifier quoted in error messages (falls back to TAGS_LOOKUP_ID)
    #[arg(long)]
    pub id: Option<String>,

    /// Output format, json or text (falls back to TAGS_OUTPUT_FORMAT)
    #[arg(long, short = 'f')]
    pub format: Option<OutputFormat>,
}

fn setup_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env()) // reads RUST_LOG
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .try_init();
}

/// Command line values take precedence over the environment.
fn apply_args(mut config: CostTagsConfig, args: Args) -> CostTagsConfig {
    if let Some(input) = args.input {
        config.lookup_config.input = Some(input);
    }
    if let Some(id) = args.id {
        config.lookup_config.id = id;
    }
    if let Some(format) = args.format {
        config.lookup_config.output_format = format;
    }
    config
}

pub fn render(result: &TagsResult, format: OutputFormat) -> AnyResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Text => Ok(result
            .tags()
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

pub async fn start(args: Args) -> AnyResult<()> {
    dotenv().ok();

    setup_logging();

    let config = CostTagsConfig::load()
        .await
        .map_err(|e| anyhow!("Failed to load configs: {}", e))?;
    let config = apply_args(config, args);
    debug!("CONFIGS: {:?}", &config);

    let input = config.lookup_config.input.as_deref().ok_or_else(|| {
        anyhow!("No lookup document given, pass --input or set TAGS_LOOKUP_INPUT")
    })?;
    info!(
        "Reading lookup document from {}",
        loaders::DocumentSource::parse(input)
    );
    let document = loaders::load(input).await.map_err(|e| anyhow!(e))?;
    let query = parse_lookup(&document)?;

    let client = AwsClientFactory::new(config.aws_config.clone())
        .create()
        .await?;

    let result = lookup_tags(&client, &query, &config.lookup_config.id).await?;

    println!("{}", render(&result, config.lookup_config.output_format)?);

    Ok(())
}
