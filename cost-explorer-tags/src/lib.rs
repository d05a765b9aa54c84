pub mod configs;
pub mod cost_explorer;
pub mod domain;
pub mod lookup;
pub mod runner;
pub mod schema;

pub use cost_explorer::{AwsClient, CostExplorerClient, CostExplorerError};
pub use domain::{TagsQuery, TagsResult};
pub use lookup::{LookupError, build_request, lookup_tags};
pub use schema::{SchemaError, parse_lookup};
