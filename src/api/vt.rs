//! Admin RPC endpoint
//!
//! `POST /v1/vt` with methods `<namespace>.<method>`:
//! - `count(search)` - number of matching records
//! - `get(search, viewOps)` - one page of summaries
//! - `getByID(id)` - full record
//! - `add(<entity>)` - validate and insert, returns the stored record
//! - `update(<entity>)` - validate and replace, returns whether a row changed
//! - `delete(id)` - remove, returns whether a row was removed
//! - `validate(<entity>)` - field errors without writing

use axum::{body::Bytes, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::Value;

use super::jsonrpc::{self, params, result, RpcError};
use super::types::{
    Author, AuthorSearch, Category, CategorySearch, News, NewsSearch, NewsSummary, Tag,
    TagSearch, ViewOps,
};
use super::AppState;
use crate::db::query::Relations;
use crate::db::search;
use crate::models;

#[derive(Deserialize)]
struct SearchParams<S> {
    #[serde(default)]
    search: Option<S>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetParams<S> {
    #[serde(default)]
    search: Option<S>,
    #[serde(default)]
    view_ops: Option<ViewOps>,
}

#[derive(Deserialize)]
struct IdParams {
    id: i64,
}

#[derive(Deserialize)]
struct CategoryParams {
    category: Category,
}

#[derive(Deserialize)]
struct TagParams {
    tag: Tag,
}

#[derive(Deserialize)]
struct AuthorParams {
    author: Author,
}

#[derive(Deserialize)]
struct NewsParams {
    news: News,
}

pub async fn handler(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    jsonrpc::handle(&body, |method, p| {
        let state = state.clone();
        async move { dispatch(&state, &method, p).await }
    })
    .await
}

pub async fn dispatch(state: &AppState, method: &str, p: Value) -> Result<Value, RpcError> {
    match method.split_once('.') {
        Some(("category", m)) => category(state, m, p).await,
        Some(("tag", m)) => tag(state, m, p).await,
        Some(("author", m)) => author(state, m, p).await,
        Some(("news", m)) => news(state, m, p).await,
        _ => Err(RpcError::method_not_found(method)),
    }
}

fn search_of<S, D>(search: Option<S>) -> D
where
    S: Into<D>,
    D: Default,
{
    search.map(Into::into).unwrap_or_default()
}

async fn category(state: &AppState, method: &str, p: Value) -> Result<Value, RpcError> {
    let svc = &state.categories;
    match method {
        "count" => {
            let p: SearchParams<CategorySearch> = params(p)?;
            result(svc.count(&search_of::<_, search::CategorySearch>(p.search)).await?)
        }
        "get" => {
            let p: GetParams<CategorySearch> = params(p)?;
            let spec = p
                .view_ops
                .unwrap_or_default()
                .spec(search_of::<_, search::CategorySearch>(p.search), state.admin_page_size);
            let list: Vec<Category> = svc.get(&spec).await?.into_iter().map(Into::into).collect();
            result(list)
        }
        "getByID" => {
            let p: IdParams = params(p)?;
            result(Category::from(svc.get_by_id(p.id).await?))
        }
        "add" => {
            let p: CategoryParams = params(p)?;
            result(Category::from(svc.add(p.category.into()).await?))
        }
        "update" => {
            let p: CategoryParams = params(p)?;
            result(svc.update(p.category.into()).await?)
        }
        "delete" => {
            let p: IdParams = params(p)?;
            result(svc.delete(p.id).await?)
        }
        "validate" => {
            let p: CategoryParams = params(p)?;
            let entity: models::Category = p.category.into();
            result(svc.validate(&entity).await?)
        }
        _ => Err(RpcError::method_not_found(&format!("category.{}", method))),
    }
}

async fn tag(state: &AppState, method: &str, p: Value) -> Result<Value, RpcError> {
    let svc = &state.tags;
    match method {
        "count" => {
            let p: SearchParams<TagSearch> = params(p)?;
            result(svc.count(&search_of::<_, search::TagSearch>(p.search)).await?)
        }
        "get" => {
            let p: GetParams<TagSearch> = params(p)?;
            let spec = p
                .view_ops
                .unwrap_or_default()
                .spec(search_of::<_, search::TagSearch>(p.search), state.admin_page_size);
            let list: Vec<Tag> = svc.get(&spec).await?.into_iter().map(Into::into).collect();
            result(list)
        }
        "getByID" => {
            let p: IdParams = params(p)?;
            result(Tag::from(svc.get_by_id(p.id).await?))
        }
        "add" => {
            let p: TagParams = params(p)?;
            result(Tag::from(svc.add(p.tag.into()).await?))
        }
        "update" => {
            let p: TagParams = params(p)?;
            result(svc.update(p.tag.into()).await?)
        }
        "delete" => {
            let p: IdParams = params(p)?;
            result(svc.delete(p.id).await?)
        }
        "validate" => {
            let p: TagParams = params(p)?;
            let entity: models::Tag = p.tag.into();
            result(svc.validate(&entity).await?)
        }
        _ => Err(RpcError::method_not_found(&format!("tag.{}", method))),
    }
}

async fn author(state: &AppState, method: &str, p: Value) -> Result<Value, RpcError> {
    let svc = &state.authors;
    match method {
        "count" => {
            let p: SearchParams<AuthorSearch> = params(p)?;
            result(svc.count(&search_of::<_, search::AuthorSearch>(p.search)).await?)
        }
        "get" => {
            let p: GetParams<AuthorSearch> = params(p)?;
            let spec = p
                .view_ops
                .unwrap_or_default()
                .spec(search_of::<_, search::AuthorSearch>(p.search), state.admin_page_size);
            let list: Vec<Author> = svc.get(&spec).await?.into_iter().map(Into::into).collect();
            result(list)
        }
        "getByID" => {
            let p: IdParams = params(p)?;
            result(Author::from(svc.get_by_id(p.id).await?))
        }
        "add" => {
            let p: AuthorParams = params(p)?;
            result(Author::from(svc.add(p.author.into()).await?))
        }
        "update" => {
            let p: AuthorParams = params(p)?;
            result(svc.update(p.author.into()).await?)
        }
        "delete" => {
            let p: IdParams = params(p)?;
            result(svc.delete(p.id).await?)
        }
        "validate" => {
            let p: AuthorParams = params(p)?;
            let entity: models::Author = p.author.into();
            result(svc.validate(&entity).await?)
        }
        _ => Err(RpcError::method_not_found(&format!("author.{}", method))),
    }
}

async fn news(state: &AppState, method: &str, p: Value) -> Result<Value, RpcError> {
    let svc = &state.news;
    match method {
        "count" => {
            let p: SearchParams<NewsSearch> = params(p)?;
            result(svc.count(&search_of::<_, search::NewsSearch>(p.search)).await?)
        }
        "get" => {
            let p: GetParams<NewsSearch> = params(p)?;
            let mut spec = p
                .view_ops
                .unwrap_or_default()
                .spec(search_of::<_, search::NewsSearch>(p.search), state.admin_page_size);
            spec.relations = Relations::default_news();
            let list: Vec<NewsSummary> =
                svc.get(&spec).await?.into_iter().map(Into::into).collect();
            result(list)
        }
        "getByID" => {
            let p: IdParams = params(p)?;
            result(News::from(svc.get_by_id(p.id).await?))
        }
        "add" => {
            let p: NewsParams = params(p)?;
            result(News::from(svc.add(p.news.into()).await?))
        }
        "update" => {
            let p: NewsParams = params(p)?;
            result(svc.update(p.news.into()).await?)
        }
        "delete" => {
            let p: IdParams = params(p)?;
            result(svc.delete(p.id).await?)
        }
        "validate" => {
            let p: NewsParams = params(p)?;
            let entity: models::News = p.news.into();
            result(svc.validate(&entity).await?)
        }
        _ => Err(RpcError::method_not_found(&format!("news.{}", method))),
    }
}
