use aws_sdk_costexplorer::types::Dimension;
use serde_derive::Deserialize;

use super::{SchemaError, check_len, single_item};
use crate::domain::{Expression, MatchOption, ValuesSelector};

const COST_CATEGORY_KEY_MAX_LEN: usize = 50;
const TAG_KEY_MAX_LEN: usize = 1024;
const VALUE_MAX_LEN: usize = 1024;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpressionInput {
    #[serde(default)]
    pub and: Vec<ExpressionInput>,
    #[serde(default)]
    pub or: Vec<ExpressionInput>,
    #[serde(default)]
    pub not: Vec<ExpressionInput>,
    #[serde(default)]
    pub cost_category: Vec<ValuesInput>,
    #[serde(default)]
    pub dimension: Vec<ValuesInput>,
    #[serde(default)]
    pub tags: Vec<ValuesInput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValuesInput {
    pub key: Option<String>,
    #[serde(default)]
    pub match_options: Vec<String>,
    #[serde(default)]
    pub values: Vec<String>,
}

enum SelectorKind {
    CostCategory,
    Dimension,
    Tags,
}

impl ExpressionInput {
    pub fn validate(self, path: &str) -> Result<Expression, SchemaError> {
        let mut builder = Expression::builder();

        for (i, expression) in self.and.into_iter().enumerate() {
            builder = builder.and(expression.validate(&format!("{path}.and.{i}"))?);
        }

        for (i, expression) in self.or.into_iter().enumerate() {
            builder = builder.or(expression.validate(&format!("{path}.or.{i}"))?);
        }

        let not_path = format!("{path}.not");
        if let Some(expression) = single_item(&not_path, self.not)? {
            builder = builder.not(expression.validate(&format!("{not_path}.0"))?);
        }

        let cost_category_path = format!("{path}.cost_category");
        if let Some(values) = single_item(&cost_category_path, self.cost_category)? {
            builder = builder.cost_category(values.validate(
                &format!("{cost_category_path}.0"),
                SelectorKind::CostCategory,
            )?);
        }

        let dimension_path = format!("{path}.dimension");
        if let Some(values) = single_item(&dimension_path, self.dimension)? {
            builder = builder.dimension(
                values.validate(&format!("{dimension_path}.0"), SelectorKind::Dimension)?,
            );
        }

        let tags_path = format!("{path}.tags");
        if let Some(values) = single_item(&tags_path, self.tags)? {
            builder =
                builder.tags(values.validate(&format!("{tags_path}.0"), SelectorKind::Tags)?);
        }

        Ok(builder.build())
    }
}

impl ValuesInput {
    fn validate(self, path: &str, kind: SelectorKind) -> Result<ValuesSelector, SchemaError> {
        let key = self.key.unwrap_or_default();
        let key_path = format!("{path}.key");

        match kind {
            SelectorKind::CostCategory => check_len(&key_path, &key, 0, COST_CATEGORY_KEY_MAX_LEN)?,
            SelectorKind::Tags => check_len(&key_path, &key, 0, TAG_KEY_MAX_LEN)?,
            SelectorKind::Dimension => {
                if !Dimension::values().contains(&key.as_str()) {
                    return Err(SchemaError::InvalidAttribute {
                        path: key_path,
                        reason: format!("unknown dimension: {key}"),
                    });
                }
            }
        }

        let match_options = self
            .match_options
            .iter()
            .map(|option| {
                option
                    .parse::<MatchOption>()
                    .map_err(|reason| SchemaError::InvalidAttribute {
                        path: format!("{path}.match_options"),
                        reason,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        for value in &self.values {
            check_len(&format!("{path}.values"), value, 0, VALUE_MAX_LEN)?;
        }

        Ok(ValuesSelector::new(key, match_options, self.values))
    }
}
