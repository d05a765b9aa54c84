use std::{fmt, sync::Arc};

use crate::domain::{AccountId, Expression, SortDefinition, TimePeriod};

pub mod adapters;
pub mod factory;

#[cfg(test)]
pub(crate) mod mock_endpoint;

/// Arguments of a single `GetTags` call.
#[derive(Debug, Clone, PartialEq)]
pub struct GetTagsRequest {
    pub time_period: TimePeriod,
    pub filter: Option<Expression>,
    pub search_string: Option<String>,
    pub sort_by: Option<Vec<SortDefinition>>,
    pub tag_key: Option<String>,
}

impl GetTagsRequest {
    pub fn new(time_period: TimePeriod) -> Self {
        Self {
            time_period,
            filter: None,
            search_string: None,
            sort_by: None,
            tag_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GetTagsResponse {
    tags: Option<Vec<String>>,
}

impl GetTagsResponse {
    pub fn new(tags: Option<Vec<String>>) -> Self {
        Self { tags }
    }

    pub fn with_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: Some(tags.into_iter().map(Into::into).collect()),
        }
    }

    pub fn tags(&self) -> Option<&[String]> {
        self.tags.as_deref()
    }

    pub fn into_tags(self) -> Option<Vec<String>> {
        self.tags
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CostExplorerError {
    RequestFailed(String),
    InvalidRequest(String),
}

impl fmt::Display for CostExplorerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            Self::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
        }
    }
}

impl std::error::Error for CostExplorerError {}

/// The subset of the Cost Explorer API used for tag lookups
#[async_trait::async_trait]
pub trait CostExplorerClient: Send + Sync {
    async fn get_tags(&self, request: GetTagsRequest)
    -> Result<GetTagsResponse, CostExplorerError>;
}

/// Connection handle shared by lookups: the Cost Explorer client and the
/// account it is authenticated as.
#[derive(Clone)]
pub struct AwsClient {
    cost_explorer: Arc<dyn CostExplorerClient>,
    account_id: AccountId,
}

impl AwsClient {
    pub fn new(cost_explorer: Arc<dyn CostExplorerClient>, account_id: AccountId) -> Self {
        Self {
            cost_explorer,
            account_id,
        }
    }

    pub fn cost_explorer(&self) -> &dyn CostExplorerClient {
        self.cost_explorer.as_ref()
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }
}

impl fmt::Debug for AwsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsClient")
            .field("account_id", &self.account_id)
            .finish()
    }
}
