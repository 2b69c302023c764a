//! Structural field rules
//!
//! Entities describe their fields as [`FieldRule`] descriptors; [`check_basic`]
//! interprets them. Only the first failing rule of a field is reported.

use once_cell::sync::Lazy;
use regex::Regex;

use super::validator::{FieldError, FieldErrorKind};
use crate::models::Status;

static ALIAS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("alias pattern is valid")
});

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

/// One structural constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Non-blank text or a non-zero number
    Required,
    /// At most this many characters
    MaxLength(usize),
    /// A known [`Status`] id
    Status,
    /// Lower-case URL slug: `world-news`, `2024`
    Alias,
    Email,
}

/// The value a rule is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Int(i64),
}

/// A field, its current value and the rules it must satisfy.
#[derive(Debug, Clone)]
pub struct FieldRule<'a> {
    /// Wire name reported in errors
    pub field: &'static str,
    pub value: FieldValue<'a>,
    pub rules: &'static [Rule],
}

impl<'a> FieldRule<'a> {
    pub fn text(field: &'static str, value: &'a str, rules: &'static [Rule]) -> Self {
        Self {
            field,
            value: FieldValue::Text(value),
            rules,
        }
    }

    pub fn int(field: &'static str, value: impl Into<i64>, rules: &'static [Rule]) -> Self {
        Self {
            field,
            value: FieldValue::Int(value.into()),
            rules,
        }
    }
}

/// Something with structural rules.
pub trait Validate {
    fn field_rules(&self) -> Vec<FieldRule<'_>>;
}

/// Run every descriptor and collect the field errors, in descriptor order.
pub fn check_basic<T: Validate + ?Sized>(entity: &T) -> Vec<FieldError> {
    entity
        .field_rules()
        .iter()
        .filter_map(|descriptor| {
            descriptor
                .rules
                .iter()
                .find_map(|rule| violation(*rule, descriptor.value))
                .map(|(kind, max)| FieldError::new(descriptor.field, kind).with_max(max))
        })
        .collect()
}

fn violation(rule: Rule, value: FieldValue<'_>) -> Option<(FieldErrorKind, Option<usize>)> {
    let ok = match (rule, value) {
        (Rule::Required, FieldValue::Text(s)) => !s.trim().is_empty(),
        (Rule::Required, FieldValue::Int(n)) => n != 0,
        (Rule::MaxLength(max), FieldValue::Text(s)) => {
            if s.chars().count() > max {
                return Some((FieldErrorKind::Max, Some(max)));
            }
            true
        }
        (Rule::MaxLength(_), FieldValue::Int(_)) => true,
        (Rule::Status, FieldValue::Int(n)) => {
            i32::try_from(n).ok().and_then(Status::from_id).is_some()
        }
        (Rule::Status, FieldValue::Text(_)) => false,
        (Rule::Alias, FieldValue::Text(s)) => ALIAS_RE.is_match(s),
        (Rule::Email, FieldValue::Text(s)) => EMAIL_RE.is_match(s),
        (Rule::Alias | Rule::Email, FieldValue::Int(_)) => false,
    };

    if ok {
        return None;
    }
    let kind = match rule {
        Rule::Required => FieldErrorKind::Required,
        Rule::MaxLength(_) => FieldErrorKind::Max,
        Rule::Status => FieldErrorKind::Incorrect,
        Rule::Alias | Rule::Email => FieldErrorKind::Format,
    };
    Some((kind, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe {
        title: String,
        alias: String,
        status_id: i32,
        email: String,
    }

    impl Validate for Probe {
        fn field_rules(&self) -> Vec<FieldRule<'_>> {
            vec![
                FieldRule::text("title", &self.title, &[Rule::Required, Rule::MaxLength(5)]),
                FieldRule::text("alias", &self.alias, &[Rule::Required, Rule::Alias]),
                FieldRule::int("statusId", self.status_id, &[Rule::Required, Rule::Status]),
                FieldRule::text("email", &self.email, &[Rule::Email]),
            ]
        }
    }

    fn valid() -> Probe {
        Probe {
            title: "News".into(),
            alias: "world-news".into(),
            status_id: 1,
            email: "ann@example.com".into(),
        }
    }

    #[test]
    fn test_valid_entity_has_no_errors() {
        assert!(check_basic(&valid()).is_empty());
    }

    #[test]
    fn test_first_failing_rule_per_field() {
        let probe = Probe {
            title: "   ".into(),
            alias: "".into(),
            status_id: 0,
            ..valid()
        };
        let errors = check_basic(&probe);
        let kinds: Vec<(&str, FieldErrorKind)> =
            errors.iter().map(|e| (e.field.as_str(), e.error)).collect();
        assert_eq!(
            kinds,
            vec![
                ("title", FieldErrorKind::Required),
                ("alias", FieldErrorKind::Required),
                ("statusId", FieldErrorKind::Required),
            ]
        );
    }

    #[test]
    fn test_max_length_counts_characters() {
        let probe = Probe {
            title: "ñññññ".into(),
            ..valid()
        };
        assert!(check_basic(&probe).is_empty());

        let probe = Probe {
            title: "ñññññn".into(),
            ..valid()
        };
        let errors = check_basic(&probe);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error, FieldErrorKind::Max);
        assert_eq!(errors[0].constraint.as_ref().map(|c| c.max), Some(5));
    }

    #[test]
    fn test_format_rules() {
        for alias in ["World", "world news", "-world", "world-", "a--b"] {
            let probe = Probe {
                alias: alias.into(),
                ..valid()
            };
            assert_eq!(check_basic(&probe)[0].error, FieldErrorKind::Format, "{alias}");
        }

        let probe = Probe {
            email: "not-an-email".into(),
            status_id: 7,
            ..valid()
        };
        let errors = check_basic(&probe);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "statusId");
        assert_eq!(errors[0].error, FieldErrorKind::Incorrect);
        assert_eq!(errors[1].error, FieldErrorKind::Format);
    }
}
