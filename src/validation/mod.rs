//! Two-tier validation
//!
//! Tier 1 is structural and needs nothing but the value: each entity lists
//! its fields as [`FieldRule`] descriptors and [`check_basic`] interprets
//! them. Tier 2 needs the store (alias uniqueness, referenced rows) and is
//! run by the services on top of a [`Validator`] seeded from tier 1.

mod entities;
mod rules;
mod validator;

pub use rules::{check_basic, FieldRule, FieldValue, Rule, Validate};
pub use validator::{FieldError, FieldErrorConstraint, FieldErrorKind, ValidationFailure, Validator};
