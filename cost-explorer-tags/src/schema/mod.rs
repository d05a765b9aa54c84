//! Inbound lookup document.
//!
//! The document mirrors the block layout used by configuration tools:
//! nested blocks are lists, single blocks are lists with one item.
//!
//! ```json
//! {
//!   "time_period": [{ "start": "2023-01-01", "end": "2023-01-31" }],
//!   "tag_key": "env",
//!   "sort_by": [{ "key": "UnblendedCost", "sort_order": "DESCENDING" }]
//! }
//! ```
//!
//! Validation happens here so that the lookup itself only ever sees
//! well-formed queries.

use std::fmt;

use serde_derive::Deserialize;

use crate::domain::{
    Metric, SortDefinition, SortOrder, TagsQuery, TagsQueryBuilder, TimePeriod,
};

pub mod expression;

pub use expression::{ExpressionInput, ValuesInput};

const SEARCH_STRING_MAX_LEN: usize = 1024;
const TAG_KEY_MAX_LEN: usize = 1024;
const DATE_MAX_LEN: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    InvalidDocument(String),
    MissingAttribute(String),
    InvalidAttribute { path: String, reason: String },
    TooManyItems { path: String, max: usize },
    ConflictingAttributes(String, String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDocument(msg) => write!(f, "Invalid lookup document: {}", msg),
            Self::MissingAttribute(path) => write!(f, "Missing required attribute: {}", path),
            Self::InvalidAttribute { path, reason } => {
                write!(f, "Invalid attribute {}: {}", path, reason)
            }
            Self::TooManyItems { path, max } => {
                write!(f, "Attribute {} accepts at most {} item(s)", path, max)
            }
            Self::ConflictingAttributes(a, b) => write!(f, "{} conflicts with {}", a, b),
        }
    }
}

impl std::error::Error for SchemaError {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagsLookupInput {
    #[serde(default)]
    pub filter: Vec<ExpressionInput>,
    pub search_string: Option<String>,
    #[serde(default)]
    pub sort_by: Vec<SortByInput>,
    pub tag_key: Option<String>,
    #[serde(default)]
    pub time_period: Vec<TimePeriodInput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SortByInput {
    pub key: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimePeriodInput {
    pub start: String,
    pub end: String,
}

impl TagsLookupInput {
    pub fn from_json(document: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(document).map_err(|e| SchemaError::InvalidDocument(e.to_string()))
    }

    pub fn validate(self) -> Result<TagsQuery, SchemaError> {
        if self.search_string.is_some() && !self.sort_by.is_empty() {
            return Err(SchemaError::ConflictingAttributes(
                "search_string".to_string(),
                "sort_by".to_string(),
            ));
        }

        let mut builder = TagsQueryBuilder::new().time_period(validate_time_period(
            self.time_period,
        )?);

        if let Some(filter) = single_item("filter", self.filter)? {
            builder = builder.filter(filter.validate("filter.0")?);
        }

        if let Some(search_string) = self.search_string {
            check_len("search_string", &search_string, 1, SEARCH_STRING_MAX_LEN)?;
            builder = builder.search_string(search_string);
        }

        if !self.sort_by.is_empty() {
            let sort_by = self
                .sort_by
                .into_iter()
                .enumerate()
                .map(|(i, entry)| entry.validate(&format!("sort_by.{i}")))
                .collect::<Result<Vec<_>, _>>()?;
            builder = builder.sort_by(sort_by);
        }

        if let Some(tag_key) = self.tag_key {
            check_len("tag_key", &tag_key, 1, TAG_KEY_MAX_LEN)?;
            builder = builder.tag_key(tag_key);
        }

        // conflicts and the required time period are checked above
        builder.build().map_err(|e| SchemaError::InvalidDocument(e.to_string()))
    }
}

impl SortByInput {
    /// A sort entry without a key cannot be sent, so it is rejected instead
    /// of being dropped from the list.
    fn validate(self, path: &str) -> Result<SortDefinition, SchemaError> {
        let key = self
            .key
            .ok_or_else(|| SchemaError::MissingAttribute(format!("{path}.key")))?;
        let key = key.parse::<Metric>().map_err(|reason| SchemaError::InvalidAttribute {
            path: format!("{path}.key"),
            reason,
        })?;

        let sort_order = self
            .sort_order
            .map(|order| {
                order
                    .parse::<SortOrder>()
                    .map_err(|reason| SchemaError::InvalidAttribute {
                        path: format!("{path}.sort_order"),
                        reason,
                    })
            })
            .transpose()?;

        Ok(SortDefinition::new(key, sort_order))
    }
}

fn validate_time_period(time_period: Vec<TimePeriodInput>) -> Result<TimePeriod, SchemaError> {
    let time_period = single_item("time_period", time_period)?
        .ok_or_else(|| SchemaError::MissingAttribute("time_period".to_string()))?;

    check_len("time_period.0.start", &time_period.start, 0, DATE_MAX_LEN)?;
    check_len("time_period.0.end", &time_period.end, 0, DATE_MAX_LEN)?;

    Ok(TimePeriod::new(time_period.start, time_period.end))
}

/// Unwraps a single-item block list.
pub(crate) fn single_item<T>(path: &str, items: Vec<T>) -> Result<Option<T>, SchemaError> {
    if items.len() > 1 {
        return Err(SchemaError::TooManyItems {
            path: path.to_string(),
            max: 1,
        });
    }
    Ok(items.into_iter().next())
}

/// Length in characters, inclusive on both ends.
pub(crate) fn check_len(path: &str, value: &str, min: usize, max: usize) -> Result<(), SchemaError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(SchemaError::InvalidAttribute {
            path: path.to_string(),
            reason: format!("expected length between {min} and {max}, got {len}"),
        });
    }
    Ok(())
}

/// Parses and validates a lookup document in one step.
pub fn parse_lookup(document: &str) -> Result<TagsQuery, SchemaError> {
    TagsLookupInput::from_json(document)?.validate()
}
