use std::{collections::BTreeSet, fmt};

use tracing::{debug, error, info};

use crate::{
    cost_explorer::{AwsClient, GetTagsRequest},
    domain::{Expression, TagsQuery, TagsResult},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    UpstreamCallFailed { id: String, message: String },
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpstreamCallFailed { id, message } => {
                write!(f, "error reading CostExplorer Tags ({}): {}", id, message)
            }
        }
    }
}

impl std::error::Error for LookupError {}

/// Translates a validated query into a `GetTags` request, field by field.
pub fn build_request(query: &TagsQuery) -> GetTagsRequest {
    let mut request = GetTagsRequest::new(query.time_period().clone());

    if let Some(filter) = query.filter() {
        request.filter = Some(filter.clone());
    }

    if let Some(search_string) = query.search_string() {
        request.search_string = Some(search_string.to_string());
    }

    if let Some(sort_by) = query.sort_by() {
        request.sort_by = Some(sort_by.to_vec());
    }

    if let Some(tag_key) = query.tag_key() {
        request.tag_key = Some(tag_key.to_string());
    }

    request
}

fn flatten_tags(tags: Option<Vec<String>>) -> BTreeSet<String> {
    tags.into_iter().flatten().collect()
}

/// Runs one tag lookup.
///
/// `id` is the caller's identifier for this lookup and only shows up in
/// errors. The returned result carries the account id of `client`. Dropping
/// the future cancels the in-flight request.
pub async fn lookup_tags(
    client: &AwsClient,
    query: &TagsQuery,
    id: &str,
) -> Result<TagsResult, LookupError> {
    let request = build_request(query);

    debug!(
        start = request.time_period.start(),
        end = request.time_period.end(),
        filter_depth = request.filter.as_ref().map(Expression::depth),
        search_string = request.search_string.as_deref(),
        sort_by = request.sort_by.as_ref().map(Vec::len),
        tag_key = request.tag_key.as_deref(),
        "Looking up Cost Explorer tags"
    );

    let response = client
        .cost_explorer()
        .get_tags(request)
        .await
        .map_err(|e| {
            error!(id, error = %e, "Cost Explorer GetTags failed");
            LookupError::UpstreamCallFailed {
                id: id.to_string(),
                message: e.to_string(),
            }
        })?;

    let tags = flatten_tags(response.into_tags());
    info!(count = tags.len(), "Cost Explorer tags read");

    Ok(TagsResult::new(client.account_id().clone(), tags))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::{
        cost_explorer::adapters::LocalCostExplorer,
        domain::{
            AccountId, MatchOption, Metric, SortDefinition, SortOrder, TagsQueryBuilder,
            TimePeriod, ValuesSelector,
        },
    };

    const ACCOUNT_ID: &str = "123456789012";

    fn january() -> TimePeriod {
        TimePeriod::new("2023-01-01", "2023-01-31")
    }

    fn client(local: &LocalCostExplorer) -> AwsClient {
        AwsClient::new(Arc::new(local.clone()), AccountId::new(ACCOUNT_ID))
    }

    fn env_filter() -> Expression {
        Expression::builder()
            .tags(ValuesSelector::new(
                "env",
                [MatchOption::Equals],
                ["prod".to_string()],
            ))
            .build()
    }

    #[test]
    fn test_request_carries_only_configured_fields() {
        let query = TagsQueryBuilder::new()
            .time_period(january())
            .build()
            .unwrap();

        let request = build_request(&query);

        assert_eq!(request, GetTagsRequest::new(january()));
    }

    #[test]
    fn test_request_with_filter_and_tag_key() {
        let query = TagsQueryBuilder::new()
            .time_period(january())
            .filter(env_filter())
            .tag_key("team")
            .build()
            .unwrap();

        let request = build_request(&query);

        assert_eq!(request.filter, Some(env_filter()));
        assert_eq!(request.tag_key.as_deref(), Some("team"));
        assert!(request.search_string.is_none());
        assert!(request.sort_by.is_none());
    }

    #[test]
    fn test_request_keeps_sort_by() {
        let sort_by = vec![SortDefinition::new(
            Metric::UnblendedCost,
            Some(SortOrder::Ascending),
        )];
        let query = TagsQueryBuilder::new()
            .time_period(january())
            .sort_by(sort_by.clone())
            .build()
            .unwrap();

        let request = build_request(&query);

        assert_eq!(request.sort_by, Some(sort_by));
    }

    #[test]
    fn test_request_keeps_search_string() {
        let query = TagsQueryBuilder::new()
            .time_period(january())
            .search_string("prod")
            .build()
            .unwrap();

        assert_eq!(build_request(&query).search_string.as_deref(), Some("prod"));
    }

    #[test]
    fn test_request_time_period_verbatim() {
        let query = TagsQueryBuilder::new()
            .time_period(january())
            .build()
            .unwrap();

        let request = build_request(&query);

        assert_eq!(request.time_period.start(), "2023-01-01");
        assert_eq!(request.time_period.end(), "2023-01-31");
    }

    #[tokio::test]
    async fn test_lookup_returns_tag_set_and_account_id() {
        let local = LocalCostExplorer::with_tags(["env:prod", "env:dev"]);
        let query = TagsQueryBuilder::new()
            .time_period(january())
            .tag_key("env")
            .build()
            .unwrap();

        let result = lookup_tags(&client(&local), &query, "").await.unwrap();

        assert_eq!(
            result.tags(),
            &BTreeSet::from(["env:dev".to_string(), "env:prod".to_string()])
        );
        assert_eq!(result.id().as_str(), ACCOUNT_ID);
        assert_eq!(local.last_request(), Some(build_request(&query)));
    }

    #[tokio::test]
    async fn test_lookup_result_ignores_response_order_and_duplicates() {
        let forward = LocalCostExplorer::with_tags(["env:prod", "env:dev"]);
        let backward = LocalCostExplorer::with_tags(["env:dev", "env:prod", "env:dev"]);
        let query = TagsQueryBuilder::new()
            .time_period(january())
            .build()
            .unwrap();

        let a = lookup_tags(&client(&forward), &query, "").await.unwrap();
        let b = lookup_tags(&client(&backward), &query, "").await.unwrap();

        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_lookup_without_tag_list_is_empty() {
        let local = LocalCostExplorer::without_tags();
        let query = TagsQueryBuilder::new()
            .time_period(january())
            .build()
            .unwrap();

        let result = lookup_tags(&client(&local), &query, "").await.unwrap();

        assert!(result.tags().is_empty());
        assert_eq!(result.id().as_str(), ACCOUNT_ID);
    }

    #[tokio::test]
    async fn test_upstream_failure_mentions_id_and_message() {
        let local = LocalCostExplorer::failing("ThrottlingException: Rate exceeded");
        let query = TagsQueryBuilder::new()
            .time_period(january())
            .build()
            .unwrap();

        let err = lookup_tags(&client(&local), &query, "lookup-42")
            .await
            .unwrap_err();

        let LookupError::UpstreamCallFailed { id, message } = &err;
        assert_eq!(id, "lookup-42");
        assert!(message.contains("ThrottlingException"));

        let text = err.to_string();
        assert!(text.contains("lookup-42"));
        assert!(text.contains("ThrottlingException"));
        assert_eq!(local.requests().len(), 1);
    }
}
