//! UpdateSpec - the three independent effects of an upsert.

use serde_json::{Number, Value};

use super::RawDocument;
use crate::DocumentError;

/// Overwrite (`$set`), counter increment (`$inc`) and insert-only defaults
/// (`$setOnInsert`), applied together by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSpec {
    set: RawDocument,
    inc: Vec<(String, i64)>,
    set_on_insert: RawDocument,
}

impl UpdateSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set.insert(field.into(), value.into());
        self
    }

    /// Overwrite every field of `fields`.
    pub fn set_all(mut self, fields: RawDocument) -> Self {
        self.set.extend(fields);
        self
    }

    pub fn inc(mut self, field: impl Into<String>, by: i64) -> Self {
        self.inc.push((field.into(), by));
        self
    }

    pub fn set_on_insert(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_on_insert.insert(field.into(), value.into());
        self
    }

    pub fn sets(&self) -> &RawDocument {
        &self.set
    }

    pub fn increments(&self) -> &[(String, i64)] {
        &self.inc
    }

    pub fn insert_defaults(&self) -> &RawDocument {
        &self.set_on_insert
    }

    /// Apply to `doc`. `inserting` enables the `$setOnInsert` clause.
    ///
    /// Counters are unsigned. A stored value that is not a counter, or an
    /// increment that would leave the `u64` range, fails without touching
    /// `doc`.
    pub fn apply(&self, doc: &mut RawDocument, inserting: bool) -> Result<(), DocumentError> {
        let mut counters = Vec::with_capacity(self.inc.len());
        for (field, by) in &self.inc {
            let current = match doc.get(field) {
                None | Some(Value::Null) => 0,
                Some(value) => value.as_u64().ok_or_else(|| {
                    DocumentError::Store(format!("field {} is not a counter: {}", field, value))
                })?,
            };
            let next = current.checked_add_signed(*by).ok_or_else(|| {
                DocumentError::Store(format!("counter {} out of range", field))
            })?;
            counters.push((field, next));
        }

        for (field, value) in &self.set {
            doc.insert(field.clone(), value.clone());
        }
        for (field, next) in counters {
            doc.insert(field.clone(), Value::Number(Number::from(next)));
        }
        if inserting {
            for (field, value) in &self.set_on_insert {
                doc.insert(field.clone(), value.clone());
            }
        }
        Ok(())
    }
}
