//! Validation result accumulator
//!
//! Collects field errors from both tiers and, separately, the first
//! infrastructure failure hit while checking. An infrastructure failure
//! always outranks field errors when the result is reported.

use serde::Serialize;

use super::rules::{check_basic, Validate};

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldErrorKind {
    Required,
    Max,
    Format,
    /// Value already taken by another record
    Unique,
    /// Value references something that does not exist or is out of domain
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldErrorConstraint {
    pub max: usize,
}

/// A rejected field, named as on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub error: FieldErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<FieldErrorConstraint>,
}

impl FieldError {
    pub fn new(field: impl Into<String>, error: FieldErrorKind) -> Self {
        Self {
            field: field.into(),
            error,
            constraint: None,
        }
    }

    pub fn with_max(mut self, max: Option<usize>) -> Self {
        self.constraint = max.map(|max| FieldErrorConstraint { max });
        self
    }
}

/// Outcome of a failed validation.
#[derive(Debug)]
pub enum ValidationFailure {
    Fields(Vec<FieldError>),
    Internal(anyhow::Error),
}

#[derive(Debug, Default)]
pub struct Validator {
    fields: Vec<FieldError>,
    internal: Option<anyhow::Error>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the structural checks of `entity`.
    pub fn for_entity<T: Validate + ?Sized>(entity: &T) -> Self {
        Self {
            fields: check_basic(entity),
            internal: None,
        }
    }

    pub fn append(&mut self, field: &str, error: FieldErrorKind) {
        self.fields.push(FieldError::new(field, error));
    }

    /// Record a store failure. The first one is kept.
    pub fn set_internal_error(&mut self, err: anyhow::Error) {
        if self.internal.is_none() {
            self.internal = Some(err);
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.fields.is_empty() || self.internal.is_some()
    }

    pub fn has_internal_error(&self) -> bool {
        self.internal.is_some()
    }

    pub fn has_field_error(&self, field: &str) -> bool {
        self.fields.iter().any(|e| e.field == field)
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.fields
    }

    pub fn into_result(self) -> Result<(), ValidationFailure> {
        if let Some(err) = self.internal {
            return Err(ValidationFailure::Internal(err));
        }
        if self.fields.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailure::Fields(self.fields))
        }
    }

    /// Field errors as a plain list; only an infrastructure failure is an error.
    pub fn into_fields(self) -> anyhow::Result<Vec<FieldError>> {
        match self.internal {
            Some(err) => Err(err),
            None => Ok(self.fields),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_empty_validator_passes() {
        let v = Validator::new();
        assert!(!v.has_errors());
        assert!(v.into_result().is_ok());
    }

    #[test]
    fn test_field_errors_are_ordered() {
        let mut v = Validator::new();
        v.append("categoryId", FieldErrorKind::Incorrect);
        v.append("tagIds", FieldErrorKind::Incorrect);
        assert!(v.has_errors());
        assert!(!v.has_internal_error());
        assert!(v.has_field_error("tagIds"));

        match v.into_result() {
            Err(ValidationFailure::Fields(fields)) => {
                let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, vec!["categoryId", "tagIds"]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_internal_error_wins() {
        let mut v = Validator::new();
        v.append("alias", FieldErrorKind::Unique);
        v.set_internal_error(anyhow!("connection reset"));
        v.set_internal_error(anyhow!("second failure"));
        assert!(v.has_errors());
        assert!(v.has_internal_error());

        match v.into_result() {
            Err(ValidationFailure::Internal(err)) => assert_eq!(err.to_string(), "connection reset"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_into_fields() {
        let mut v = Validator::new();
        v.append("alias", FieldErrorKind::Unique);
        assert_eq!(v.into_fields().unwrap().len(), 1);

        let mut v = Validator::new();
        v.set_internal_error(anyhow!("down"));
        assert!(v.into_fields().is_err());
    }

    #[test]
    fn test_field_error_wire_shape() {
        let err = FieldError::new("title", FieldErrorKind::Max).with_max(Some(255));
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"field": "title", "error": "max", "constraint": {"max": 255}})
        );

        let json = serde_json::to_value(FieldError::new("alias", FieldErrorKind::Unique)).unwrap();
        assert_eq!(json, serde_json::json!({"field": "alias", "error": "unique"}));
    }
}
