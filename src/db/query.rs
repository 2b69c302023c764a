//! Query composition
//!
//! Turns a declarative [`QuerySpec`] (filter, sort request, pager, relations)
//! into SQL text plus bind arguments for one table definition. Compilation is
//! pure: nothing here touches the pool, so every rule (allow-listed sorting,
//! pagination windows, relation joins, dialect differences) is testable on
//! the generated SQL alone. [`super::executor`] runs the result.

use chrono::{DateTime, Utc};

use crate::config::DatabaseDriver;

/// A bind argument.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(i64),
    NullableInt(Option<i64>),
    Text(String),
    NullableText(Option<String>),
    Timestamp(DateTime<Utc>),
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(i64::from(v))
    }
}

impl From<Option<i32>> for SqlValue {
    fn from(v: Option<i32>) -> Self {
        SqlValue::NullableInt(v.map(i64::from))
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<Option<String>> for SqlValue {
    fn from(v: Option<String>) -> Self {
        SqlValue::NullableText(v)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(v)
    }
}

/// One WHERE condition. Columns are table-qualified SQL expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq(&'static str, SqlValue),
    NotEq(&'static str, SqlValue),
    /// Case-insensitive substring match. The column must hold text already
    /// folded with [`fold_case`].
    ILike(&'static str, String),
    /// `column IN (...)`; an empty list renders nothing
    In(&'static str, Vec<i64>),
    /// JSON array column contains the id
    ContainsId(&'static str, i64),
}

/// Case folding applied to stored search columns and to search text alike.
/// Folding in Rust keeps matching Unicode-aware on SQLite, whose `LOWER()`
/// only folds ASCII.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Escape character for LIKE patterns, the same on every driver.
const LIKE_ESCAPE: char = '!';

/// `%needle%` with the needle folded and its wildcards escaped.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in fold_case(needle).chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// A search whose fields each contribute zero or one predicate.
pub trait Filter {
    fn predicates(&self) -> Vec<Predicate>;
}

/// Pushes a predicate only when the optional field is set.
pub(crate) fn push_opt<T>(
    predicates: &mut Vec<Predicate>,
    value: &Option<T>,
    build: impl FnOnce(&T) -> Predicate,
) {
    if let Some(v) = value {
        predicates.push(build(v));
    }
}

/// A resolved ORDER BY term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortField {
    pub column: &'static str,
    pub desc: bool,
}

impl SortField {
    pub const fn asc(column: &'static str) -> Self {
        Self { column, desc: false }
    }

    pub const fn desc(column: &'static str) -> Self {
        Self { column, desc: true }
    }
}

/// A caller's sort request, keyed by wire column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortRequest {
    pub column: String,
    pub desc: bool,
}

/// Pagination window. `page` is 1-based; `page_size: None` means no limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub page: u32,
    pub page_size: Option<u32>,
}

/// Largest OFFSET both stores accept (a signed 64-bit integer).
const MAX_OFFSET: u64 = i64::MAX as u64;

impl Pager {
    /// Every matching row, for internal bulk loads.
    pub const NO_LIMIT: Pager = Pager {
        page: 1,
        page_size: None,
    };

    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: Some(page_size.max(1)),
        }
    }

    /// Normalise client input: absent or non-positive values take the defaults
    /// (page 1, `default_size`).
    pub fn from_request(page: Option<i64>, page_size: Option<i64>, default_size: u32) -> Self {
        let page = page
            .filter(|p| *p > 0)
            .map(|p| u32::try_from(p).unwrap_or(u32::MAX))
            .unwrap_or(1);
        let size = page_size
            .filter(|s| *s > 0)
            .map(|s| u32::try_from(s).unwrap_or(u32::MAX))
            .unwrap_or(default_size);
        Self::new(page, size)
    }

    pub fn limit(&self) -> Option<u64> {
        self.page_size.map(u64::from)
    }

    pub fn offset(&self) -> u64 {
        match self.page_size {
            Some(size) => {
                (u64::from(self.page.saturating_sub(1)) * u64::from(size)).min(MAX_OFFSET)
            }
            None => 0,
        }
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::NO_LIMIT
    }
}

/// A related entity that can be eager-loaded in the same statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Category,
    Author,
}

/// Set of relations to eager-load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relations(Vec<Relation>);

impl Relations {
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn only(relation: Relation) -> Self {
        Self(vec![relation])
    }

    pub fn of(relations: &[Relation]) -> Self {
        let mut set = Self::none();
        for relation in relations {
            if !set.contains(*relation) {
                set.0.push(*relation);
            }
        }
        set
    }

    /// Everything a single news page shows: category and author.
    pub fn full_news() -> Self {
        Self::of(&[Relation::Category, Relation::Author])
    }

    /// What news lists show: the category.
    pub fn default_news() -> Self {
        Self::only(Relation::Category)
    }

    pub fn contains(&self, relation: Relation) -> bool {
        self.0.contains(&relation)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A LEFT JOIN that loads one relation, with its aliased result columns.
#[derive(Debug)]
pub struct Join {
    pub relation: Relation,
    pub clause: &'static str,
    pub columns: &'static [&'static str],
}

/// Static description of one entity table.
#[derive(Debug)]
pub struct TableDef {
    pub name: &'static str,
    pub alias: &'static str,
    /// SELECT list, `alias.column AS column`
    pub columns: &'static [&'static str],
    /// Sort allow-list: wire name to qualified column
    pub sortable: &'static [(&'static str, &'static str)],
    pub default_sort: &'static [SortField],
    pub joins: &'static [Join],
}

impl TableDef {
    /// Resolve a sort request against the allow-list. Unknown or absent
    /// columns fall back to the default order.
    pub fn sort_fields(&self, request: Option<&SortRequest>) -> Vec<SortField> {
        let resolved = request.and_then(|req| {
            self.sortable
                .iter()
                .find(|(name, _)| *name == req.column)
                .map(|(_, column)| SortField {
                    column: *column,
                    desc: req.desc,
                })
        });

        match resolved {
            Some(field) => {
                let id = self.sortable.iter().find(|(name, _)| *name == "id");
                let mut fields = vec![field];
                if let Some((_, id_column)) = id {
                    if *id_column != field.column {
                        fields.push(SortField::asc(*id_column));
                    }
                }
                fields
            }
            None => self.default_sort.to_vec(),
        }
    }
}

/// Everything a read needs. Built once by the caller, never mutated by the
/// engine.
#[derive(Debug, Clone)]
pub struct QuerySpec<F> {
    pub filter: F,
    pub sort: Option<SortRequest>,
    pub pager: Pager,
    pub relations: Relations,
}

impl<F> QuerySpec<F> {
    pub fn new(filter: F, pager: Pager) -> Self {
        Self {
            filter,
            sort: None,
            pager,
            relations: Relations::none(),
        }
    }

    /// All rows matching `filter`, default order, no relations.
    pub fn unpaged(filter: F) -> Self {
        Self::new(filter, Pager::NO_LIMIT)
    }
}

/// SQL text with its positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub args: Vec<SqlValue>,
}

/// Build `SELECT ... FROM table [JOIN ...] WHERE ... ORDER BY ... LIMIT ... OFFSET ...`.
pub fn compile_select<F: Filter>(
    table: &TableDef,
    spec: &QuerySpec<F>,
    driver: DatabaseDriver,
) -> CompiledQuery {
    let mut columns: Vec<&str> = table.columns.to_vec();
    let mut joins = String::new();
    for join in table.joins {
        if spec.relations.contains(join.relation) {
            columns.extend_from_slice(join.columns);
            joins.push(' ');
            joins.push_str(join.clause);
        }
    }

    let mut sql = format!(
        "SELECT {} FROM {} {}{}",
        columns.join(", "),
        table.name,
        table.alias,
        joins
    );
    let mut args = Vec::new();
    append_where(&mut sql, &mut args, &spec.filter.predicates(), driver);

    let order: Vec<String> = table
        .sort_fields(spec.sort.as_ref())
        .iter()
        .map(|f| format!("{} {}", f.column, if f.desc { "DESC" } else { "ASC" }))
        .collect();
    if !order.is_empty() {
        sql.push_str(" ORDER BY ");
        sql.push_str(&order.join(", "));
    }

    if let Some(limit) = spec.pager.limit() {
        sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, spec.pager.offset()));
    }

    CompiledQuery { sql, args }
}

/// Build `SELECT COUNT(*) AS count FROM table WHERE ...`.
pub fn compile_count<F: Filter>(table: &TableDef, filter: &F, driver: DatabaseDriver) -> CompiledQuery {
    let mut sql = format!("SELECT COUNT(*) AS count FROM {} {}", table.name, table.alias);
    let mut args = Vec::new();
    append_where(&mut sql, &mut args, &filter.predicates(), driver);
    CompiledQuery { sql, args }
}

/// Build `INSERT INTO table (cols) VALUES (?, ...)`.
pub fn compile_insert(table: &TableDef, values: Vec<(&'static str, SqlValue)>) -> CompiledQuery {
    let (columns, args): (Vec<&str>, Vec<SqlValue>) = values.into_iter().unzip();
    let placeholders = vec!["?"; columns.len()].join(", ");
    CompiledQuery {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table.name,
            columns.join(", "),
            placeholders
        ),
        args,
    }
}

/// Build `UPDATE table SET col = ?, ... WHERE id = ?`.
pub fn compile_update(table: &TableDef, id: i64, values: Vec<(&'static str, SqlValue)>) -> CompiledQuery {
    let (columns, mut args): (Vec<&str>, Vec<SqlValue>) = values.into_iter().unzip();
    let assignments: Vec<String> = columns.iter().map(|c| format!("{} = ?", c)).collect();
    args.push(SqlValue::Int(id));
    CompiledQuery {
        sql: format!(
            "UPDATE {} SET {} WHERE id = ?",
            table.name,
            assignments.join(", ")
        ),
        args,
    }
}

/// Build `DELETE FROM table WHERE id = ?`.
pub fn compile_delete(table: &TableDef, id: i64) -> CompiledQuery {
    CompiledQuery {
        sql: format!("DELETE FROM {} WHERE id = ?", table.name),
        args: vec![SqlValue::Int(id)],
    }
}

fn append_where(
    sql: &mut String,
    args: &mut Vec<SqlValue>,
    predicates: &[Predicate],
    driver: DatabaseDriver,
) {
    let mut clauses = Vec::with_capacity(predicates.len());
    for predicate in predicates {
        match predicate {
            Predicate::Eq(column, value) => {
                clauses.push(format!("{} = ?", column));
                args.push(value.clone());
            }
            Predicate::NotEq(column, value) => {
                clauses.push(format!("{} <> ?", column));
                args.push(value.clone());
            }
            Predicate::ILike(column, needle) => {
                clauses.push(format!("{} LIKE ? ESCAPE '{}'", column, LIKE_ESCAPE));
                args.push(SqlValue::Text(like_pattern(needle)));
            }
            Predicate::In(column, ids) => {
                if ids.is_empty() {
                    continue;
                }
                let placeholders = vec!["?"; ids.len()].join(", ");
                clauses.push(format!("{} IN ({})", column, placeholders));
                args.extend(ids.iter().map(|id| SqlValue::Int(*id)));
            }
            Predicate::ContainsId(column, id) => match driver {
                DatabaseDriver::Sqlite => {
                    clauses.push(format!(
                        "EXISTS (SELECT 1 FROM json_each({}) WHERE json_each.value = ?)",
                        column
                    ));
                    args.push(SqlValue::Int(*id));
                }
                DatabaseDriver::Mysql => {
                    clauses.push(format!("JSON_CONTAINS({}, ?)", column));
                    args.push(SqlValue::Text(id.to_string()));
                }
            },
        }
    }

    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
}
