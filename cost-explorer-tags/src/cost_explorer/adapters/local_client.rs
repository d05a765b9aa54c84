use std::sync::{Arc, Mutex, MutexGuard};

use crate::cost_explorer::{
    CostExplorerClient, CostExplorerError, GetTagsRequest, GetTagsResponse,
};

#[derive(Debug, Clone)]
enum Outcome {
    Tags(Option<Vec<String>>),
    Failure(String),
}

/// In-memory Cost Explorer answering every call with the same outcome and
/// keeping the requests it received.
#[derive(Debug, Clone)]
pub struct LocalCostExplorer {
    outcome: Outcome,
    requests: Arc<Mutex<Vec<GetTagsRequest>>>,
}

impl LocalCostExplorer {
    pub fn with_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_outcome(Outcome::Tags(Some(
            tags.into_iter().map(Into::into).collect(),
        )))
    }

    /// Responds without a tag list at all.
    pub fn without_tags() -> Self {
        Self::with_outcome(Outcome::Tags(None))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_outcome(Outcome::Failure(message.into()))
    }

    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn lock_requests(&self) -> MutexGuard<'_, Vec<GetTagsRequest>> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn requests(&self) -> Vec<GetTagsRequest> {
        self.lock_requests().clone()
    }

    pub fn last_request(&self) -> Option<GetTagsRequest> {
        self.lock_requests().last().cloned()
    }
}

#[async_trait::async_trait]
impl CostExplorerClient for LocalCostExplorer {
    async fn get_tags(
        &self,
        request: GetTagsRequest,
    ) -> Result<GetTagsResponse, CostExplorerError> {
        self.lock_requests().push(request);

        match &self.outcome {
            Outcome::Tags(tags) => Ok(GetTagsResponse::new(tags.clone())),
            Outcome::Failure(message) => Err(CostExplorerError::RequestFailed(message.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimePeriod;

    fn request() -> GetTagsRequest {
        GetTagsRequest::new(TimePeriod::new("2023-01-01", "2023-01-31"))
    }

    #[tokio::test]
    async fn test_returns_canned_tags_and_records_request() {
        let client = LocalCostExplorer::with_tags(["env:prod"]);

        let response = client.get_tags(request()).await.unwrap();

        assert_eq!(response.tags(), Some(&["env:prod".to_string()][..]));
        assert_eq!(client.requests().len(), 1);
        assert_eq!(client.last_request(), Some(request()));
    }

    #[tokio::test]
    async fn test_failing_client() {
        let client = LocalCostExplorer::failing("AccessDeniedException");

        let err = client.get_tags(request()).await.unwrap_err();

        assert_eq!(
            err,
            CostExplorerError::RequestFailed("AccessDeniedException".to_string())
        );
        assert_eq!(client.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_recorded_requests() {
        let client = LocalCostExplorer::without_tags();
        let clone = client.clone();

        clone.get_tags(request()).await.unwrap();

        assert_eq!(client.requests().len(), 1);
    }
}
