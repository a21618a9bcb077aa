//! Filter - field-based predicates over raw documents.

use std::cmp::Ordering;

use serde_json::Value;

use super::RawDocument;
use crate::DocumentError;

static NULL: Value = Value::Null;

/// A single predicate applied to one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    /// Field value is one of the listed values.
    In(Vec<Value>),
    /// String field starts with the given prefix (`$regex: "^..."`).
    Prefix(String),
}

impl Condition {
    fn matches(&self, actual: Option<&Value>) -> bool {
        let actual = actual.unwrap_or(&NULL);
        match self {
            Condition::Eq(expected) => equals(actual, expected),
            Condition::Gt(bound) => compare_values(actual, bound) == Some(Ordering::Greater),
            Condition::Gte(bound) => matches!(
                compare_values(actual, bound),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Condition::Lt(bound) => compare_values(actual, bound) == Some(Ordering::Less),
            Condition::Lte(bound) => matches!(
                compare_values(actual, bound),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Condition::In(values) => values.iter().any(|v| equals(actual, v)),
            Condition::Prefix(prefix) => actual
                .as_str()
                .map(|s| s.starts_with(prefix.as_str()))
                .unwrap_or(false),
        }
    }
}

/// Conjunction of field conditions. An empty filter matches every document.
///
/// ```ignore
/// let adults = Filter::all().gte("age", 18).prefix("name", "Fi");
/// let same = Filter::parse(&json!({"age": {"$gte": 18}, "name": {"$regex": "^Fi"}}))?;
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Condition)>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter on the reserved `id` field.
    pub fn by_id(id: impl Into<String>) -> Self {
        let id: String = id.into();
        Self::all().eq("id", id)
    }

    pub fn condition(mut self, field: impl Into<String>, condition: Condition) -> Self {
        self.clauses.push((field.into(), condition));
        self
    }

    pub fn eq(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.condition(field, Condition::Eq(value.into()))
    }

    pub fn gt(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.condition(field, Condition::Gt(value.into()))
    }

    pub fn gte(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.condition(field, Condition::Gte(value.into()))
    }

    pub fn lt(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.condition(field, Condition::Lt(value.into()))
    }

    pub fn lte(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.condition(field, Condition::Lte(value.into()))
    }

    pub fn is_in<I, V>(self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.condition(field, Condition::In(values))
    }

    pub fn prefix(self, field: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.condition(field, Condition::Prefix(prefix.into()))
    }

    /// Parse a nested key/value filter such as
    /// `{"age": 3, "score": {"$gt": 5}, "tag": {"$in": ["a", "b"]}}`.
    ///
    /// `$regex` only supports anchored prefixes (`"^abc"`).
    pub fn parse(value: &Value) -> Result<Self, DocumentError> {
        let object = value
            .as_object()
            .ok_or_else(|| DocumentError::InvalidFilter("filter must be an object".into()))?;

        let mut filter = Filter::all();
        for (field, spec) in object {
            match spec {
                Value::Object(ops) if ops.keys().all(|k| k.starts_with('$')) && !ops.is_empty() => {
                    for (op, operand) in ops {
                        filter = filter.condition(field.clone(), parse_operator(op, operand)?);
                    }
                }
                other => filter = filter.eq(field.clone(), other.clone()),
            }
        }
        Ok(filter)
    }

    pub fn clauses(&self) -> &[(String, Condition)] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, doc: &RawDocument) -> bool {
        self.clauses
            .iter()
            .all(|(field, condition)| condition.matches(lookup(doc, field)))
    }

    /// Equality clauses on top-level fields, used to seed upserted documents.
    pub fn equality_fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.clauses.iter().filter_map(|(field, condition)| match condition {
            Condition::Eq(value) if !field.contains('.') => Some((field.as_str(), value)),
            _ => None,
        })
    }
}

fn parse_operator(op: &str, operand: &Value) -> Result<Condition, DocumentError> {
    match op {
        "$eq" => Ok(Condition::Eq(operand.clone())),
        "$gt" => Ok(Condition::Gt(operand.clone())),
        "$gte" => Ok(Condition::Gte(operand.clone())),
        "$lt" => Ok(Condition::Lt(operand.clone())),
        "$lte" => Ok(Condition::Lte(operand.clone())),
        "$in" => operand
            .as_array()
            .map(|values| Condition::In(values.clone()))
            .ok_or_else(|| DocumentError::InvalidFilter("$in expects an array".into())),
        "$regex" => operand
            .as_str()
            .and_then(|pattern| pattern.strip_prefix('^'))
            .map(|prefix| Condition::Prefix(prefix.to_string()))
            .ok_or_else(|| {
                DocumentError::InvalidFilter("$regex only supports anchored prefixes".into())
            }),
        other => Err(DocumentError::InvalidFilter(format!(
            "unsupported filter operator {}",
            other
        ))),
    }
}

/// Resolve a dotted path (`"owner.name"`) inside a document.
pub(crate) fn lookup<'a>(doc: &'a RawDocument, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = doc.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

fn equals(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::Array(items), scalar) if !scalar.is_array() => {
            items.iter().any(|item| equals(item, scalar))
        }
        _ => actual == expected,
    }
}

/// Ordering between two values of the same kind; `None` when incomparable.
pub(crate) fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}
