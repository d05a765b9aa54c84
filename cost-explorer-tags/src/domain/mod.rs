use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt, str::FromStr};

pub mod expression;

pub use expression::{Expression, ExpressionBuilder, MatchOption, ValuesSelector};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Date range searched by Cost Explorer. `start` is inclusive and `end` is
/// exclusive; both are passed through as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePeriod {
    start: String,
    end: String,
}

impl TimePeriod {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    AmortizedCost,
    BlendedCost,
    NetAmortizedCost,
    NetUnblendedCost,
    NormalizedUsageAmount,
    UnblendedCost,
    UsageQuantity,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::AmortizedCost,
        Metric::BlendedCost,
        Metric::NetAmortizedCost,
        Metric::NetUnblendedCost,
        Metric::NormalizedUsageAmount,
        Metric::UnblendedCost,
        Metric::UsageQuantity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AmortizedCost => "AmortizedCost",
            Self::BlendedCost => "BlendedCost",
            Self::NetAmortizedCost => "NetAmortizedCost",
            Self::NetUnblendedCost => "NetUnblendedCost",
            Self::NormalizedUsageAmount => "NormalizedUsageAmount",
            Self::UnblendedCost => "UnblendedCost",
            Self::UsageQuantity => "UsageQuantity",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Metric {
    type Err = String;

    // Case sensitive, the API rejects any other spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|metric| metric.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Invalid metric: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "ASCENDING",
            Self::Descending => "DESCENDING",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASCENDING" => Ok(Self::Ascending),
            "DESCENDING" => Ok(Self::Descending),
            _ => Err(format!("Invalid sort order: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDefinition {
    key: Metric,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort_order: Option<SortOrder>,
}

impl SortDefinition {
    pub fn new(key: Metric, sort_order: Option<SortOrder>) -> Self {
        Self { key, sort_order }
    }

    pub fn key(&self) -> Metric {
        self.key
    }

    pub fn sort_order(&self) -> Option<SortOrder> {
        self.sort_order
    }
}

/// A validated tag lookup. Built by the schema layer, so `search_string` and
/// `sort_by` are never both present.
#[derive(Debug, Clone, PartialEq)]
pub struct TagsQuery {
    filter: Option<Expression>,
    search_string: Option<String>,
    sort_by: Option<Vec<SortDefinition>>,
    tag_key: Option<String>,
    time_period: TimePeriod,
}

impl TagsQuery {
    pub fn filter(&self) -> Option<&Expression> {
        self.filter.as_ref()
    }

    pub fn search_string(&self) -> Option<&str> {
        self.search_string.as_deref()
    }

    pub fn sort_by(&self) -> Option<&[SortDefinition]> {
        self.sort_by.as_deref()
    }

    pub fn tag_key(&self) -> Option<&str> {
        self.tag_key.as_deref()
    }

    pub fn time_period(&self) -> &TimePeriod {
        &self.time_period
    }
}

pub struct TagsQueryBuilder {
    filter: Option<Expression>,
    search_string: Option<String>,
    sort_by: Option<Vec<SortDefinition>>,
    tag_key: Option<String>,
    time_period: Option<TimePeriod>,
}

impl TagsQueryBuilder {
    pub fn new() -> Self {
        Self {
            filter: None,
            search_string: None,
            sort_by: None,
            tag_key: None,
            time_period: None,
        }
    }

    pub fn filter(mut self, filter: Expression) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn search_string(mut self, search_string: impl Into<String>) -> Self {
        self.search_string = Some(search_string.into());
        self
    }

    pub fn sort_by(mut self, sort_by: Vec<SortDefinition>) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    pub fn tag_key(mut self, tag_key: impl Into<String>) -> Self {
        self.tag_key = Some(tag_key.into());
        self
    }

    pub fn time_period(mut self, time_period: TimePeriod) -> Self {
        self.time_period = Some(time_period);
        self
    }

    pub fn build(self) -> Result<TagsQuery, TagsQueryError> {
        // an empty list means "not set"
        let sort_by = self.sort_by.filter(|sort_by| !sort_by.is_empty());

        if self.search_string.is_some() && sort_by.is_some() {
            return Err(TagsQueryError::SearchStringConflictsWithSortBy);
        }

        Ok(TagsQuery {
            filter: self.filter,
            search_string: self.search_string,
            sort_by,
            tag_key: self.tag_key,
            time_period: self.time_period.ok_or(TagsQueryError::MissingTimePeriod)?,
        })
    }
}

impl Default for TagsQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagsQueryError {
    MissingTimePeriod,
    SearchStringConflictsWithSortBy,
}

impl fmt::Display for TagsQueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTimePeriod => write!(f, "Time period is required"),
            Self::SearchStringConflictsWithSortBy => {
                write!(f, "search_string conflicts with sort_by")
            }
        }
    }
}

impl std::error::Error for TagsQueryError {}

/// Output of a lookup: the tag values and the account they were read for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagsResult {
    id: AccountId,
    tags: BTreeSet<String>,
}

impl TagsResult {
    pub fn new(id: AccountId, tags: BTreeSet<String>) -> Self {
        Self { id, tags }
    }

    pub fn id(&self) -> &AccountId {
        &self.id
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn into_tags(self) -> BTreeSet<String> {
        self.tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn january() -> TimePeriod {
        TimePeriod::new("2023-01-01", "2023-01-31")
    }

    #[test]
    fn test_tags_query_creation() {
        let query = TagsQueryBuilder::new()
            .time_period(january())
            .tag_key("env")
            .build()
            .unwrap();

        assert_eq!(query.time_period().start(), "2023-01-01");
        assert_eq!(query.time_period().end(), "2023-01-31");
        assert_eq!(query.tag_key(), Some("env"));
        assert!(query.filter().is_none());
        assert!(query.search_string().is_none());
        assert!(query.sort_by().is_none());
    }

    #[test]
    fn test_builder_missing_time_period() {
        let result = TagsQueryBuilder::new().tag_key("env").build();

        assert_eq!(result.unwrap_err(), TagsQueryError::MissingTimePeriod);
    }

    #[test]
    fn test_builder_rejects_search_string_with_sort_by() {
        let result = TagsQueryBuilder::new()
            .time_period(january())
            .search_string("prod")
            .sort_by(vec![SortDefinition::new(Metric::UnblendedCost, None)])
            .build();

        assert_eq!(
            result.unwrap_err(),
            TagsQueryError::SearchStringConflictsWithSortBy
        );
    }

    #[test]
    fn test_builder_drops_empty_sort_by() {
        let query = TagsQueryBuilder::new()
            .time_period(january())
            .sort_by(vec![])
            .build()
            .unwrap();

        assert!(query.sort_by().is_none());
    }

    #[test]
    fn test_builder_allows_search_string_with_empty_sort_by() {
        let query = TagsQueryBuilder::new()
            .time_period(january())
            .search_string("prod")
            .sort_by(vec![])
            .build()
            .unwrap();

        assert_eq!(query.search_string(), Some("prod"));
        assert!(query.sort_by().is_none());
    }

    #[test]
    fn test_metric_from_str() {
        for metric in Metric::ALL {
            assert_eq!(metric.as_str().parse::<Metric>().unwrap(), metric);
        }
        assert!("unblendedcost".parse::<Metric>().is_err());
        assert!("".parse::<Metric>().is_err());
    }

    #[test]
    fn test_sort_order_from_str() {
        assert_eq!("ASCENDING".parse::<SortOrder>(), Ok(SortOrder::Ascending));
        assert_eq!("DESCENDING".parse::<SortOrder>(), Ok(SortOrder::Descending));
        assert!("ascending".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_tags_result_serialization() {
        let result = TagsResult::new(
            AccountId::new("123456789012"),
            BTreeSet::from(["env:prod".to_string(), "env:dev".to_string()]),
        );

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "id": "123456789012",
                "tags": ["env:dev", "env:prod"]
            })
        );
    }
}
