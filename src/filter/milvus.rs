//! Milvus boolean-expression backend
//!
//! Filters target the JSON `metadata` field of a Milvus collection, e.g.
//! `metadata["lang"] == "en"`.

use serde_json::Value;

use super::error::{FilterError, FilterResult};
use super::translator::{CompoundFilterTranslator, ComparisonOperator, SearchFilterTranslator};

/// Translates filters into Milvus filter expressions
#[derive(Debug, Clone)]
pub struct MilvusFilterTranslator {
    field: String,
}

impl Default for MilvusFilterTranslator {
    fn default() -> Self {
        Self::new("metadata")
    }
}

impl MilvusFilterTranslator {
    /// Create a translator targeting the given JSON field
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    fn accessor(&self, key: &str) -> FilterResult<String> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(FilterError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(format!("{}[\"{}\"]", self.field, key))
    }

    fn scalar(op: ComparisonOperator, key: &str, value: &Value) -> FilterResult<String> {
        match value {
            Value::String(_) | Value::Number(_) | Value::Bool(_) => Ok(value.to_string()),
            _ => Err(FilterError::InvalidValue {
                operator: op.to_string(),
                key: key.to_string(),
                reason: "expected a string, number or boolean".to_string(),
            }),
        }
    }

    fn orderable(op: ComparisonOperator, key: &str, value: &Value) -> FilterResult<String> {
        match value {
            Value::String(_) | Value::Number(_) => Ok(value.to_string()),
            _ => Err(FilterError::InvalidValue {
                operator: op.to_string(),
                key: key.to_string(),
                reason: "expected a string or number".to_string(),
            }),
        }
    }

    fn list(op: ComparisonOperator, key: &str, value: &Value) -> FilterResult<String> {
        let Value::Array(items) = value else {
            return Err(FilterError::InvalidValue {
                operator: op.to_string(),
                key: key.to_string(),
                reason: "expected an array".to_string(),
            });
        };
        let rendered = items
            .iter()
            .map(|item| Self::scalar(op, key, item))
            .collect::<FilterResult<Vec<_>>>()?;
        Ok(format!("[{}]", rendered.join(", ")))
    }

    fn compare(
        &self,
        op: ComparisonOperator,
        symbol: &str,
        key: &str,
        value: &Value,
    ) -> FilterResult<String> {
        let accessor = self.accessor(key)?;
        let operand = match op {
            ComparisonOperator::Eq | ComparisonOperator::Ne => Self::scalar(op, key, value)?,
            _ => Self::orderable(op, key, value)?,
        };
        Ok(format!("{} {} {}", accessor, symbol, operand))
    }

    fn join(parts: Vec<String>, connective: &str) -> String {
        if parts.len() == 1 {
            return parts.into_iter().next().unwrap_or_default();
        }
        parts
            .iter()
            .map(|p| format!("({})", p))
            .collect::<Vec<_>>()
            .join(connective)
    }
}

impl SearchFilterTranslator for MilvusFilterTranslator {
    type Output = String;

    fn translate_equals(&self, key: &str, value: &Value) -> FilterResult<String> {
        self.compare(ComparisonOperator::Eq, "==", key, value)
    }

    fn translate_not_equals(&self, key: &str, value: &Value) -> FilterResult<String> {
        self.compare(ComparisonOperator::Ne, "!=", key, value)
    }

    fn translate_greater_than(&self, key: &str, value: &Value) -> FilterResult<String> {
        self.compare(ComparisonOperator::Gt, ">", key, value)
    }

    fn translate_greater_than_or_equal(&self, key: &str, value: &Value) -> FilterResult<String> {
        self.compare(ComparisonOperator::Gte, ">=", key, value)
    }

    fn translate_less_than(&self, key: &str, value: &Value) -> FilterResult<String> {
        self.compare(ComparisonOperator::Lt, "<", key, value)
    }

    fn translate_less_than_or_equal(&self, key: &str, value: &Value) -> FilterResult<String> {
        self.compare(ComparisonOperator::Lte, "<=", key, value)
    }

    fn translate_in(&self, key: &str, value: &Value) -> FilterResult<String> {
        let accessor = self.accessor(key)?;
        let list = Self::list(ComparisonOperator::In, key, value)?;
        Ok(format!("{} in {}", accessor, list))
    }

    fn translate_not_in(&self, key: &str, value: &Value) -> FilterResult<String> {
        let accessor = self.accessor(key)?;
        let list = Self::list(ComparisonOperator::Nin, key, value)?;
        Ok(format!("not ({} in {})", accessor, list))
    }
}

impl CompoundFilterTranslator for MilvusFilterTranslator {
    fn combine_and(&self, parts: Vec<String>) -> FilterResult<String> {
        Ok(Self::join(parts, " and "))
    }

    fn combine_or(&self, parts: Vec<String>) -> FilterResult<String> {
        Ok(Self::join(parts, " or "))
    }
}
