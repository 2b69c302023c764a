//! Structural rules for each entity.

use super::rules::{FieldRule, Rule, Validate};
use crate::models::{Author, Category, News, Tag};

impl Validate for Category {
    fn field_rules(&self) -> Vec<FieldRule<'_>> {
        vec![
            FieldRule::text("title", &self.title, &[Rule::Required, Rule::MaxLength(255)]),
            FieldRule::text(
                "alias",
                &self.alias,
                &[Rule::Required, Rule::Alias, Rule::MaxLength(255)],
            ),
            FieldRule::int("statusId", self.status_id, &[Rule::Required, Rule::Status]),
        ]
    }
}

impl Validate for Tag {
    fn field_rules(&self) -> Vec<FieldRule<'_>> {
        vec![
            FieldRule::text("title", &self.title, &[Rule::Required, Rule::MaxLength(128)]),
            FieldRule::int("statusId", self.status_id, &[Rule::Required, Rule::Status]),
        ]
    }
}

impl Validate for Author {
    fn field_rules(&self) -> Vec<FieldRule<'_>> {
        vec![
            FieldRule::text("name", &self.name, &[Rule::Required, Rule::MaxLength(128)]),
            FieldRule::text(
                "email",
                &self.email,
                &[Rule::Required, Rule::Email, Rule::MaxLength(255)],
            ),
            FieldRule::int("statusId", self.status_id, &[Rule::Required, Rule::Status]),
        ]
    }
}

impl Validate for News {
    fn field_rules(&self) -> Vec<FieldRule<'_>> {
        vec![
            FieldRule::text("title", &self.title, &[Rule::Required, Rule::MaxLength(255)]),
            FieldRule::text(
                "foreword",
                &self.foreword,
                &[Rule::Required, Rule::MaxLength(1024)],
            ),
            FieldRule::int("categoryId", self.category_id, &[Rule::Required]),
            FieldRule::int("authorId", self.author_id, &[Rule::Required]),
            FieldRule::int("statusId", self.status_id, &[Rule::Required, Rule::Status]),
        ]
    }
}
