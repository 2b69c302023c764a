//! Table definitions and search filters for the four portal entities.
//!
//! Each search field is optional and maps to one predicate. The table
//! definitions carry the sort allow-lists, default orders and eager-load
//! joins the query engine works from.

use chrono::{DateTime, Utc};

use super::query::{push_opt, Filter, Join, Predicate, Relation, SortField, TableDef};

pub static CATEGORY_TABLE: TableDef = TableDef {
    name: "categories",
    alias: "c",
    columns: &[
        "c.id AS id",
        "c.title AS title",
        "c.order_number AS order_number",
        "c.alias AS alias",
        "c.status_id AS status_id",
    ],
    sortable: &[
        ("id", "c.id"),
        ("title", "c.title"),
        ("orderNumber", "c.order_number"),
        ("alias", "c.alias"),
        ("statusId", "c.status_id"),
    ],
    default_sort: &[SortField::asc("c.order_number"), SortField::asc("c.id")],
    joins: &[],
};

pub static TAG_TABLE: TableDef = TableDef {
    name: "tags",
    alias: "t",
    columns: &["t.id AS id", "t.title AS title", "t.status_id AS status_id"],
    sortable: &[("id", "t.id"), ("title", "t.title"), ("statusId", "t.status_id")],
    default_sort: &[SortField::asc("t.title"), SortField::asc("t.id")],
    joins: &[],
};

pub static AUTHOR_TABLE: TableDef = TableDef {
    name: "authors",
    alias: "a",
    columns: &[
        "a.id AS id",
        "a.name AS name",
        "a.email AS email",
        "a.status_id AS status_id",
    ],
    sortable: &[
        ("id", "a.id"),
        ("name", "a.name"),
        ("email", "a.email"),
        ("statusId", "a.status_id"),
    ],
    default_sort: &[SortField::asc("a.name"), SortField::asc("a.id")],
    joins: &[],
};

pub static NEWS_TABLE: TableDef = TableDef {
    name: "news",
    alias: "n",
    columns: &[
        "n.id AS id",
        "n.title AS title",
        "n.foreword AS foreword",
        "n.content AS content",
        "n.published_at AS published_at",
        "n.status_id AS status_id",
        "n.category_id AS category_id",
        "n.author_id AS author_id",
        "n.tag_ids AS tag_ids",
    ],
    sortable: &[
        ("id", "n.id"),
        ("title", "n.title"),
        ("categoryId", "n.category_id"),
        ("authorId", "n.author_id"),
        ("publishedAt", "n.published_at"),
        ("statusId", "n.status_id"),
    ],
    default_sort: &[SortField::desc("n.published_at"), SortField::desc("n.id")],
    joins: &[
        Join {
            relation: Relation::Category,
            clause: "LEFT JOIN categories c ON c.id = n.category_id",
            columns: &[
                "c.id AS category__id",
                "c.title AS category__title",
                "c.order_number AS category__order_number",
                "c.alias AS category__alias",
                "c.status_id AS category__status_id",
            ],
        },
        Join {
            relation: Relation::Author,
            clause: "LEFT JOIN authors a ON a.id = n.author_id",
            columns: &[
                "a.id AS author__id",
                "a.name AS author__name",
                "a.email AS author__email",
                "a.status_id AS author__status_id",
            ],
        },
    ],
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySearch {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub order_number: Option<i32>,
    /// Exact alias, used by the uniqueness check
    pub alias: Option<String>,
    /// Partial alias match
    pub alias_like: Option<String>,
    pub status_id: Option<i32>,
    pub ids: Vec<i64>,
    pub not_id: Option<i64>,
}

impl Filter for CategorySearch {
    fn predicates(&self) -> Vec<Predicate> {
        let mut p = Vec::new();
        push_opt(&mut p, &self.id, |v| Predicate::Eq("c.id", (*v).into()));
        push_opt(&mut p, &self.title, |v| Predicate::ILike("c.title_search", v.clone()));
        push_opt(&mut p, &self.order_number, |v| {
            Predicate::Eq("c.order_number", (*v).into())
        });
        push_opt(&mut p, &self.alias, |v| Predicate::Eq("c.alias", v.as_str().into()));
        // aliases are lowercase ASCII by validation, so the column is its own fold
        push_opt(&mut p, &self.alias_like, |v| Predicate::ILike("c.alias", v.clone()));
        push_opt(&mut p, &self.status_id, |v| Predicate::Eq("c.status_id", (*v).into()));
        p.push(Predicate::In("c.id", self.ids.clone()));
        push_opt(&mut p, &self.not_id, |v| Predicate::NotEq("c.id", (*v).into()));
        p
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSearch {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub status_id: Option<i32>,
    pub ids: Vec<i64>,
    pub not_id: Option<i64>,
}

impl Filter for TagSearch {
    fn predicates(&self) -> Vec<Predicate> {
        let mut p = Vec::new();
        push_opt(&mut p, &self.id, |v| Predicate::Eq("t.id", (*v).into()));
        push_opt(&mut p, &self.title, |v| Predicate::ILike("t.title_search", v.clone()));
        push_opt(&mut p, &self.status_id, |v| Predicate::Eq("t.status_id", (*v).into()));
        p.push(Predicate::In("t.id", self.ids.clone()));
        push_opt(&mut p, &self.not_id, |v| Predicate::NotEq("t.id", (*v).into()));
        p
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorSearch {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub status_id: Option<i32>,
    pub ids: Vec<i64>,
    pub not_id: Option<i64>,
}

impl Filter for AuthorSearch {
    fn predicates(&self) -> Vec<Predicate> {
        let mut p = Vec::new();
        push_opt(&mut p, &self.id, |v| Predicate::Eq("a.id", (*v).into()));
        push_opt(&mut p, &self.name, |v| Predicate::ILike("a.name_search", v.clone()));
        push_opt(&mut p, &self.email, |v| Predicate::ILike("a.email_search", v.clone()));
        push_opt(&mut p, &self.status_id, |v| Predicate::Eq("a.status_id", (*v).into()));
        p.push(Predicate::In("a.id", self.ids.clone()));
        push_opt(&mut p, &self.not_id, |v| Predicate::NotEq("a.id", (*v).into()));
        p
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsSearch {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub foreword: Option<String>,
    pub category_id: Option<i64>,
    pub author_id: Option<i64>,
    /// News whose tag list contains this id
    pub tag_id: Option<i64>,
    pub published_at: Option<DateTime<Utc>>,
    pub status_id: Option<i32>,
    pub ids: Vec<i64>,
    pub not_id: Option<i64>,
}

impl Filter for NewsSearch {
    fn predicates(&self) -> Vec<Predicate> {
        let mut p = Vec::new();
        push_opt(&mut p, &self.id, |v| Predicate::Eq("n.id", (*v).into()));
        push_opt(&mut p, &self.title, |v| Predicate::ILike("n.title_search", v.clone()));
        push_opt(&mut p, &self.foreword, |v| Predicate::ILike("n.foreword_search", v.clone()));
        push_opt(&mut p, &self.category_id, |v| {
            Predicate::Eq("n.category_id", (*v).into())
        });
        push_opt(&mut p, &self.author_id, |v| Predicate::Eq("n.author_id", (*v).into()));
        push_opt(&mut p, &self.tag_id, |v| Predicate::ContainsId("n.tag_ids", *v));
        push_opt(&mut p, &self.published_at, |v| {
            Predicate::Eq("n.published_at", (*v).into())
        });
        push_opt(&mut p, &self.status_id, |v| Predicate::Eq("n.status_id", (*v).into()));
        p.push(Predicate::In("n.id", self.ids.clone()));
        push_opt(&mut p, &self.not_id, |v| Predicate::NotEq("n.id", (*v).into()));
        p
    }
}
