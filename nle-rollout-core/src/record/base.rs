//! Base implementation of records.
use crate::error::RolloutError;
use chrono::prelude::{DateTime, Local};
use std::collections::HashMap;

/// Represents possible types of values that can be stored in a [`Record`].
#[derive(Debug, Clone)]
pub enum RecordValue {
    /// A single floating-point value.
    Scalar(f32),

    /// A timestamp with local timezone.
    DateTime(DateTime<Local>),

    /// A text value.
    String(String),
}

/// A container of key-value pairs.
///
/// # Examples
///
/// ```rust
/// use nle_rollout_core::record::{Record, RecordValue};
///
/// let mut record = Record::empty();
/// record.insert("return", RecordValue::Scalar(0.5));
/// record.insert("end_status", RecordValue::String("DEATH".to_string()));
/// let r = record.get_scalar("return").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Gets a scalar value from the record.
    pub fn get_scalar(&self, k: &str) -> Result<f32, RolloutError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(RolloutError::RecordValueTypeError("Scalar".to_string())),
            None => Err(RolloutError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a string value from the record.
    pub fn get_string(&self, k: &str) -> Result<String, RolloutError> {
        match self.0.get(k) {
            Some(RecordValue::String(s)) => Ok(s.clone()),
            Some(_) => Err(RolloutError::RecordValueTypeError("String".to_string())),
            None => Err(RolloutError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a timestamp from the record.
    pub fn get_datetime(&self, k: &str) -> Result<DateTime<Local>, RolloutError> {
        match self.0.get(k) {
            Some(RecordValue::DateTime(d)) => Ok(*d),
            Some(_) => Err(RolloutError::RecordValueTypeError("DateTime".to_string())),
            None => Err(RolloutError::RecordKeyError(k.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_typed_values() {
        let mut record = Record::empty();
        record.insert("return", RecordValue::Scalar(2.5));
        record.insert("end_status", RecordValue::String("DEATH".to_string()));
        assert_eq!(record.get_scalar("return").unwrap(), 2.5);
        assert_eq!(record.get_string("end_status").unwrap(), "DEATH");
        assert!(matches!(
            record.get_scalar("end_status"),
            Err(RolloutError::RecordValueTypeError(_))
        ));
        assert!(matches!(
            record.get_datetime("missing"),
            Err(RolloutError::RecordKeyError(_))
        ));
    }

    #[test]
    fn test_insert_replaces() {
        let mut record = Record::empty();
        record.insert("length", RecordValue::Scalar(1.0));
        record.insert("length", RecordValue::Scalar(2.0));
        assert_eq!(record.get_scalar("length").unwrap(), 2.0);
    }
}
