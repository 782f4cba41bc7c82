//! In-process predicate backend over chunk metadata

use std::cmp::Ordering;

use serde_json::Value;

use super::error::{FilterError, FilterResult};
use super::translator::{CompoundFilterTranslator, ComparisonOperator, SearchFilterTranslator};
use crate::core::types::Metadata;

/// Compiled metadata predicate
pub type MetadataPredicate = Box<dyn Fn(&Metadata) -> bool + Send + Sync>;

/// Translates filters into closures evaluated against chunk metadata
///
/// Missing keys never satisfy `eq`, range or `in` comparisons, and always
/// satisfy `ne` and `nin`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataPredicateTranslator;

/// Equality with numeric normalisation so `1` matches `1.0`
pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) if a.is_number() && b.is_number() => x == y,
        _ => a == b,
    }
}

/// Ordering between two numbers or two strings
pub(crate) fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

impl MetadataPredicateTranslator {
    fn range(
        op: ComparisonOperator,
        key: &str,
        value: &Value,
        accept: fn(Ordering) -> bool,
    ) -> FilterResult<MetadataPredicate> {
        if !(value.is_number() || value.is_string()) {
            return Err(FilterError::InvalidValue {
                operator: op.to_string(),
                key: key.to_string(),
                reason: "expected a string or number".to_string(),
            });
        }
        let key = key.to_string();
        let value = value.clone();
        Ok(Box::new(move |metadata: &Metadata| {
            metadata
                .get(&key)
                .and_then(|actual| compare_values(actual, &value))
                .map(accept)
                .unwrap_or(false)
        }))
    }

    fn members(op: ComparisonOperator, key: &str, value: &Value) -> FilterResult<Vec<Value>> {
        match value {
            Value::Array(items) => Ok(items.clone()),
            _ => Err(FilterError::InvalidValue {
                operator: op.to_string(),
                key: key.to_string(),
                reason: "expected an array".to_string(),
            }),
        }
    }
}

impl SearchFilterTranslator for MetadataPredicateTranslator {
    type Output = MetadataPredicate;

    fn translate_equals(&self, key: &str, value: &Value) -> FilterResult<MetadataPredicate> {
        let key = key.to_string();
        let value = value.clone();
        Ok(Box::new(move |metadata: &Metadata| {
            metadata
                .get(&key)
                .map(|actual| values_equal(actual, &value))
                .unwrap_or(false)
        }))
    }

    fn translate_not_equals(&self, key: &str, value: &Value) -> FilterResult<MetadataPredicate> {
        let equals = self.translate_equals(key, value)?;
        Ok(Box::new(move |metadata: &Metadata| !equals(metadata)))
    }

    fn translate_greater_than(&self, key: &str, value: &Value) -> FilterResult<MetadataPredicate> {
        Self::range(ComparisonOperator::Gt, key, value, |o| o == Ordering::Greater)
    }

    fn translate_greater_than_or_equal(
        &self,
        key: &str,
        value: &Value,
    ) -> FilterResult<MetadataPredicate> {
        Self::range(ComparisonOperator::Gte, key, value, |o| o != Ordering::Less)
    }

    fn translate_less_than(&self, key: &str, value: &Value) -> FilterResult<MetadataPredicate> {
        Self::range(ComparisonOperator::Lt, key, value, |o| o == Ordering::Less)
    }

    fn translate_less_than_or_equal(
        &self,
        key: &str,
        value: &Value,
    ) -> FilterResult<MetadataPredicate> {
        Self::range(ComparisonOperator::Lte, key, value, |o| o != Ordering::Greater)
    }

    fn translate_in(&self, key: &str, value: &Value) -> FilterResult<MetadataPredicate> {
        let members = Self::members(ComparisonOperator::In, key, value)?;
        let key = key.to_string();
        Ok(Box::new(move |metadata: &Metadata| {
            metadata
                .get(&key)
                .map(|actual| members.iter().any(|m| values_equal(actual, m)))
                .unwrap_or(false)
        }))
    }

    fn translate_not_in(&self, key: &str, value: &Value) -> FilterResult<MetadataPredicate> {
        let members = Self::members(ComparisonOperator::Nin, key, value)?;
        let key = key.to_string();
        Ok(Box::new(move |metadata: &Metadata| {
            metadata
                .get(&key)
                .map(|actual| !members.iter().any(|m| values_equal(actual, m)))
                .unwrap_or(true)
        }))
    }
}

impl CompoundFilterTranslator for MetadataPredicateTranslator {
    fn combine_and(&self, parts: Vec<MetadataPredicate>) -> FilterResult<MetadataPredicate> {
        Ok(Box::new(move |metadata: &Metadata| parts.iter().all(|p| p(metadata))))
    }

    fn combine_or(&self, parts: Vec<MetadataPredicate>) -> FilterResult<MetadataPredicate> {
        Ok(Box::new(move |metadata: &Metadata| parts.iter().any(|p| p(metadata))))
    }
}
