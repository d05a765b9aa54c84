use clap::Parser;
use cost_explorer_tags::runner::{Args, start};

#[tokio::main]
async fn main() {
    if let Err(e) = start(Args::parse()).await {
        tracing::error!("Tag lookup failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
