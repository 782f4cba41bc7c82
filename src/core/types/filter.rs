//! Provider-agnostic filter expressions

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single `key <op> value` comparison
///
/// The operator tag is kept as a string so that unknown tags survive
/// deserialization and are rejected at translation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonFilter {
    /// Operator tag (`eq`, `ne`, `gt`, `gte`, `lt`, `lte`, `in`, `nin`)
    #[serde(rename = "type")]
    pub filter_type: String,

    /// Metadata key being compared
    pub key: String,

    /// Scalar or array operand
    pub value: Value,
}

impl ComparisonFilter {
    pub fn new(filter_type: impl Into<String>, key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            filter_type: filter_type.into(),
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Boolean connective for compound filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompoundOperator {
    And,
    Or,
}

/// Conjunction or disjunction of nested filters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundFilter {
    #[serde(rename = "type")]
    pub filter_type: CompoundOperator,
    pub filters: Vec<Filter>,
}

/// Filter expression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Filter {
    Compound(CompoundFilter),
    Comparison(ComparisonFilter),
}

impl Filter {
    pub fn and(filters: Vec<Filter>) -> Self {
        Filter::Compound(CompoundFilter {
            filter_type: CompoundOperator::And,
            filters,
        })
    }

    pub fn or(filters: Vec<Filter>) -> Self {
        Filter::Compound(CompoundFilter {
            filter_type: CompoundOperator::Or,
            filters,
        })
    }
}

impl From<ComparisonFilter> for Filter {
    fn from(filter: ComparisonFilter) -> Self {
        Filter::Comparison(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_tag_deserializes() {
        let filter: Filter =
            serde_json::from_value(json!({"type": "unsupported", "key": "k", "value": 1})).unwrap();
        match filter {
            Filter::Comparison(c) => assert_eq!(c.filter_type, "unsupported"),
            Filter::Compound(_) => panic!("expected comparison"),
        }
    }

    #[test]
    fn test_compound_deserializes() {
        let filter: Filter = serde_json::from_value(json!({
            "type": "and",
            "filters": [
                {"type": "eq", "key": "lang", "value": "en"},
                {"type": "or", "filters": [
                    {"type": "gt", "key": "year", "value": 2020},
                    {"type": "in", "key": "tag", "value": ["a", "b"]}
                ]}
            ]
        }))
        .unwrap();

        let Filter::Compound(compound) = filter else {
            panic!("expected compound");
        };
        assert_eq!(compound.filter_type, CompoundOperator::And);
        assert_eq!(compound.filters.len(), 2);
        assert!(matches!(compound.filters[1], Filter::Compound(_)));
    }
}
