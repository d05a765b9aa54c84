use aws_sdk_costexplorer::{
    Client,
    error::{DisplayErrorContext, ProvideErrorMetadata},
    operation::get_tags::GetTagsError,
    types::{
        CostCategoryValues, DateInterval, Dimension, DimensionValues, Expression as SdkExpression,
        MatchOption as SdkMatchOption, SortDefinition as SdkSortDefinition,
        SortOrder as SdkSortOrder, TagValues,
    },
};
use tracing::debug;

use crate::{
    cost_explorer::{CostExplorerClient, CostExplorerError, GetTagsRequest, GetTagsResponse},
    domain::{Expression, SortDefinition, TimePeriod, ValuesSelector},
};

#[derive(Clone)]
pub struct SdkCostExplorer {
    client: Client,
}

impl SdkCostExplorer {
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl std::fmt::Debug for SdkCostExplorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdkCostExplorer").finish()
    }
}

#[async_trait::async_trait]
impl CostExplorerClient for SdkCostExplorer {
    async fn get_tags(
        &self,
        request: GetTagsRequest,
    ) -> Result<GetTagsResponse, CostExplorerError> {
        debug!(
            start = request.time_period.start(),
            end = request.time_period.end(),
            tag_key = request.tag_key.as_deref(),
            "Calling Cost Explorer GetTags"
        );

        let output = self
            .client
            .get_tags()
            .time_period(date_interval(&request.time_period)?)
            .set_filter(request.filter.as_ref().map(expression_to_sdk))
            .set_search_string(request.search_string)
            .set_sort_by(sort_definitions(request.sort_by.as_deref())?)
            .set_tag_key(request.tag_key)
            .send()
            .await
            .map_err(|err| {
                CostExplorerError::RequestFailed(describe_error(&err.into_service_error()))
            })?;

        Ok(GetTagsResponse::new(Some(output.tags().to_vec())))
    }
}

/// `Code: message` for service errors. Transport failures carry no code and
/// fall back to their source chain; the raw HTTP response is never included.
fn describe_error(err: &GetTagsError) -> String {
    match (err.code(), err.message()) {
        (Some(code), Some(message)) => format!("{code}: {message}"),
        (Some(code), None) => code.to_string(),
        _ => DisplayErrorContext(err).to_string(),
    }
}

pub(crate) fn date_interval(time_period: &TimePeriod) -> Result<DateInterval, CostExplorerError> {
    DateInterval::builder()
        .start(time_period.start())
        .end(time_period.end())
        .build()
        .map_err(|e| CostExplorerError::InvalidRequest(e.to_string()))
}

pub(crate) fn sort_definitions(
    sort_by: Option<&[SortDefinition]>,
) -> Result<Option<Vec<SdkSortDefinition>>, CostExplorerError> {
    let Some(sort_by) = sort_by.filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    sort_by
        .iter()
        .map(|definition| {
            SdkSortDefinition::builder()
                .key(definition.key().as_str())
                .set_sort_order(
                    definition
                        .sort_order()
                        .map(|order| SdkSortOrder::from(order.as_str())),
                )
                .build()
                .map_err(|e| CostExplorerError::InvalidRequest(e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn match_options(selector: &ValuesSelector) -> Option<Vec<SdkMatchOption>> {
    if selector.match_options().is_empty() {
        return None;
    }
    Some(
        selector
            .match_options()
            .iter()
            .map(|option| SdkMatchOption::from(option.as_str()))
            .collect(),
    )
}

fn values(selector: &ValuesSelector) -> Option<Vec<String>> {
    if selector.values().is_empty() {
        return None;
    }
    Some(selector.values().iter().cloned().collect())
}

pub(crate) fn expression_to_sdk(expression: &Expression) -> SdkExpression {
    let mut builder = SdkExpression::builder();

    if !expression.and().is_empty() {
        builder = builder.set_and(Some(expression.and().iter().map(expression_to_sdk).collect()));
    }

    if !expression.or().is_empty() {
        builder = builder.set_or(Some(expression.or().iter().map(expression_to_sdk).collect()));
    }

    if let Some(not) = expression.not() {
        builder = builder.not(expression_to_sdk(not));
    }

    if let Some(selector) = expression.cost_category() {
        builder = builder.cost_categories(
            CostCategoryValues::builder()
                .key(selector.key())
                .set_match_options(match_options(selector))
                .set_values(values(selector))
                .build(),
        );
    }

    if let Some(selector) = expression.dimension() {
        builder = builder.dimensions(
            DimensionValues::builder()
                .key(Dimension::from(selector.key()))
                .set_match_options(match_options(selector))
                .set_values(values(selector))
                .build(),
        );
    }

    if let Some(selector) = expression.tags() {
        builder = builder.tags(
            TagValues::builder()
                .key(selector.key())
                .set_match_options(match_options(selector))
                .set_values(values(selector))
                .build(),
        );
    }

    builder.build()
}
