//! Public portal RPC endpoint (`POST /v1/rpc`, namespace `news`)

use axum::{body::Bytes, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::Value;

use super::jsonrpc::{self, params, result, RpcError};
use super::portal::{Category, News, NewsFilterParams, NewsSummary, Tag};
use super::AppState;

#[derive(Deserialize)]
struct NewsByIdParams {
    id: i64,
}

pub async fn handler(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    jsonrpc::handle(&body, |method, p| {
        let state = state.clone();
        async move { dispatch(&state, &method, p).await }
    })
    .await
}

pub async fn dispatch(state: &AppState, method: &str, p: Value) -> Result<Value, RpcError> {
    let portal = &state.portal;
    match method {
        "news.newsById" => {
            let p: NewsByIdParams = params(p)?;
            result(portal.news_by_id(p.id).await?.map(News::from))
        }
        "news.categories" => {
            let list: Vec<Category> = portal.categories().await?.into_iter().map(Into::into).collect();
            result(list)
        }
        "news.tags" => {
            let list: Vec<Tag> = portal.tags().await?.into_iter().map(Into::into).collect();
            result(list)
        }
        "news.newsWithFilters" => {
            let p: NewsFilterParams = params(p)?;
            let list: Vec<NewsSummary> = portal
                .news(p.filter(), p.page, p.page_size)
                .await?
                .into_iter()
                .map(Into::into)
                .collect();
            result(list)
        }
        "news.newsCountWithFilters" => {
            let p: NewsFilterParams = params(p)?;
            result(portal.news_count(p.filter()).await?)
        }
        _ => Err(RpcError::method_not_found(method)),
    }
}
