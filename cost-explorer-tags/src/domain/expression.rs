use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchOption {
    Equals,
    Absent,
    StartsWith,
    EndsWith,
    Contains,
    CaseSensitive,
    CaseInsensitive,
    GreaterThanOrEqual,
}

impl MatchOption {
    pub const ALL: [MatchOption; 8] = [
        MatchOption::Equals,
        MatchOption::Absent,
        MatchOption::StartsWith,
        MatchOption::EndsWith,
        MatchOption::Contains,
        MatchOption::CaseSensitive,
        MatchOption::CaseInsensitive,
        MatchOption::GreaterThanOrEqual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "EQUALS",
            Self::Absent => "ABSENT",
            Self::StartsWith => "STARTS_WITH",
            Self::EndsWith => "ENDS_WITH",
            Self::Contains => "CONTAINS",
            Self::CaseSensitive => "CASE_SENSITIVE",
            Self::CaseInsensitive => "CASE_INSENSITIVE",
            Self::GreaterThanOrEqual => "GREATER_THAN_OR_EQUAL",
        }
    }
}

impl fmt::Display for MatchOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MatchOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|option| option.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Invalid match option: {s}"))
    }
}

/// Leaf of an expression: a key plus the values and match options it is
/// compared with. Used for cost categories, dimensions and tags alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuesSelector {
    key: String,
    match_options: BTreeSet<MatchOption>,
    values: BTreeSet<String>,
}

impl ValuesSelector {
    pub fn new(
        key: impl Into<String>,
        match_options: impl IntoIterator<Item = MatchOption>,
        values: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            key: key.into(),
            match_options: match_options.into_iter().collect(),
            values: values.into_iter().collect(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn match_options(&self) -> &BTreeSet<MatchOption> {
        &self.match_options
    }

    pub fn values(&self) -> &BTreeSet<String> {
        &self.values
    }
}

/// Cost Explorer filter expression. Any combination of the fields may be set;
/// the API decides which combinations it accepts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Expression {
    and: Vec<Expression>,
    or: Vec<Expression>,
    not: Option<Box<Expression>>,
    cost_category: Option<ValuesSelector>,
    dimension: Option<ValuesSelector>,
    tags: Option<ValuesSelector>,
}

impl Expression {
    pub fn builder() -> ExpressionBuilder {
        ExpressionBuilder::default()
    }

    pub fn and(&self) -> &[Expression] {
        &self.and
    }

    pub fn or(&self) -> &[Expression] {
        &self.or
    }

    pub fn not(&self) -> Option<&Expression> {
        self.not.as_deref()
    }

    pub fn cost_category(&self) -> Option<&ValuesSelector> {
        self.cost_category.as_ref()
    }

    pub fn dimension(&self) -> Option<&ValuesSelector> {
        self.dimension.as_ref()
    }

    pub fn tags(&self) -> Option<&ValuesSelector> {
        self.tags.as_ref()
    }

    /// Nesting depth, a leaf-only expression has depth 1.
    pub fn depth(&self) -> usize {
        let nested = self
            .and
            .iter()
            .chain(self.or.iter())
            .chain(self.not.as_deref())
            .map(Expression::depth)
            .max()
            .unwrap_or(0);
        nested + 1
    }
}

#[derive(Debug, Default)]
pub struct ExpressionBuilder {
    inner: Expression,
}

impl ExpressionBuilder {
    pub fn and(mut self, expression: Expression) -> Self {
        self.inner.and.push(expression);
        self
    }

    pub fn or(mut self, expression: Expression) -> Self {
        self.inner.or.push(expression);
        self
    }

    pub fn not(mut self, expression: Expression) -> Self {
        self.inner.not = Some(Box::new(expression));
        self
    }

    pub fn cost_category(mut self, selector: ValuesSelector) -> Self {
        self.inner.cost_category = Some(selector);
        self
    }

    pub fn dimension(mut self, selector: ValuesSelector) -> Self {
        self.inner.dimension = Some(selector);
        self
    }

    pub fn tags(mut self, selector: ValuesSelector) -> Self {
        self.inner.tags = Some(selector);
        self
    }

    pub fn build(self) -> Expression {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_is(value: &str) -> Expression {
        Expression::builder()
            .dimension(ValuesSelector::new(
                "SERVICE",
                [MatchOption::Equals],
                [value.to_string()],
            ))
            .build()
    }

    #[test]
    fn test_values_selector_deduplicates() {
        let selector = ValuesSelector::new(
            "env",
            [MatchOption::Equals, MatchOption::Equals],
            ["prod".to_string(), "dev".to_string(), "prod".to_string()],
        );

        assert_eq!(selector.match_options().len(), 1);
        assert_eq!(
            selector.values().iter().collect::<Vec<_>>(),
            vec!["dev", "prod"]
        );
    }

    #[test]
    fn test_expression_depth() {
        let leaf = service_is("Amazon EC2");
        assert_eq!(leaf.depth(), 1);

        let nested = Expression::builder()
            .and(leaf.clone())
            .and(Expression::builder().not(service_is("Tax")).build())
            .build();
        assert_eq!(nested.depth(), 3);
        assert_eq!(nested.and().len(), 2);
        assert!(nested.and()[1].not().is_some());
    }

    #[test]
    fn test_match_option_from_str() {
        for option in MatchOption::ALL {
            assert_eq!(option.as_str().parse::<MatchOption>().unwrap(), option);
        }
        assert!("equals".parse::<MatchOption>().is_err());
    }
}
