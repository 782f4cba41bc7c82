//! Operator dispatch for comparison filters
//!
//! `SearchFilterTranslator` requires one handler per comparison operator,
//! so a backend that forgets an operator does not compile. The provided
//! `translate_comparison_filter` parses the tag and calls exactly one
//! handler.

use std::str::FromStr;

use serde_json::Value;

use super::error::{FilterError, FilterResult};
use crate::core::types::{ComparisonFilter, CompoundOperator, Filter};

/// Recognised comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Nin,
}

impl ComparisonOperator {
    /// Every operator, in dispatch-table order
    pub const ALL: [ComparisonOperator; 8] = [
        ComparisonOperator::Eq,
        ComparisonOperator::Ne,
        ComparisonOperator::Gt,
        ComparisonOperator::Gte,
        ComparisonOperator::Lt,
        ComparisonOperator::Lte,
        ComparisonOperator::In,
        ComparisonOperator::Nin,
    ];

    /// Wire tag of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "eq",
            ComparisonOperator::Ne => "ne",
            ComparisonOperator::Gt => "gt",
            ComparisonOperator::Gte => "gte",
            ComparisonOperator::Lt => "lt",
            ComparisonOperator::Lte => "lte",
            ComparisonOperator::In => "in",
            ComparisonOperator::Nin => "nin",
        }
    }

    /// Name of the `SearchFilterTranslator` method handling this operator
    pub fn handler_name(&self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "translate_equals",
            ComparisonOperator::Ne => "translate_not_equals",
            ComparisonOperator::Gt => "translate_greater_than",
            ComparisonOperator::Gte => "translate_greater_than_or_equal",
            ComparisonOperator::Lt => "translate_less_than",
            ComparisonOperator::Lte => "translate_less_than_or_equal",
            ComparisonOperator::In => "translate_in",
            ComparisonOperator::Nin => "translate_not_in",
        }
    }

    /// Whether the operator takes an array operand
    pub fn is_membership(&self) -> bool {
        matches!(self, ComparisonOperator::In | ComparisonOperator::Nin)
    }
}

impl FromStr for ComparisonOperator {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComparisonOperator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| FilterError::UnsupportedOperator {
                operator: s.to_string(),
            })
    }
}

impl std::fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend-specific translation of comparison filters
pub trait SearchFilterTranslator {
    /// Backend predicate type (query string, predicate closure, ...)
    type Output;

    fn translate_equals(&self, key: &str, value: &Value) -> FilterResult<Self::Output>;

    fn translate_not_equals(&self, key: &str, value: &Value) -> FilterResult<Self::Output>;

    fn translate_greater_than(&self, key: &str, value: &Value) -> FilterResult<Self::Output>;

    fn translate_greater_than_or_equal(
        &self,
        key: &str,
        value: &Value,
    ) -> FilterResult<Self::Output>;

    fn translate_less_than(&self, key: &str, value: &Value) -> FilterResult<Self::Output>;

    fn translate_less_than_or_equal(&self, key: &str, value: &Value)
        -> FilterResult<Self::Output>;

    fn translate_in(&self, key: &str, value: &Value) -> FilterResult<Self::Output>;

    fn translate_not_in(&self, key: &str, value: &Value) -> FilterResult<Self::Output>;

    /// Dispatch a comparison filter to the handler for its operator
    fn translate_comparison_filter(&self, filter: &ComparisonFilter) -> FilterResult<Self::Output> {
        let operator: ComparisonOperator = filter.filter_type.parse()?;
        let (key, value) = (filter.key.as_str(), &filter.value);

        match operator {
            ComparisonOperator::Eq => self.translate_equals(key, value),
            ComparisonOperator::Ne => self.translate_not_equals(key, value),
            ComparisonOperator::Gt => self.translate_greater_than(key, value),
            ComparisonOperator::Gte => self.translate_greater_than_or_equal(key, value),
            ComparisonOperator::Lt => self.translate_less_than(key, value),
            ComparisonOperator::Lte => self.translate_less_than_or_equal(key, value),
            ComparisonOperator::In => self.translate_in(key, value),
            ComparisonOperator::Nin => self.translate_not_in(key, value),
        }
    }
}

/// Translators that can also combine predicates with `and` / `or`
pub trait CompoundFilterTranslator: SearchFilterTranslator {
    fn combine_and(&self, parts: Vec<Self::Output>) -> FilterResult<Self::Output>;

    fn combine_or(&self, parts: Vec<Self::Output>) -> FilterResult<Self::Output>;
}

/// Translate a whole filter tree
pub fn translate_filter<T>(translator: &T, filter: &Filter) -> FilterResult<T::Output>
where
    T: CompoundFilterTranslator + ?Sized,
{
    match filter {
        Filter::Comparison(comparison) => translator.translate_comparison_filter(comparison),
        Filter::Compound(compound) => {
            if compound.filters.is_empty() {
                return Err(FilterError::EmptyCompound {
                    operator: match compound.filter_type {
                        CompoundOperator::And => "and".to_string(),
                        CompoundOperator::Or => "or".to_string(),
                    },
                });
            }

            let parts = compound
                .filters
                .iter()
                .map(|nested| translate_filter(translator, nested))
                .collect::<FilterResult<Vec<_>>>()?;

            match compound.filter_type {
                CompoundOperator::And => translator.combine_and(parts),
                CompoundOperator::Or => translator.combine_or(parts),
            }
        }
    }
}
