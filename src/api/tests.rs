use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::{build_router, AppState};
use crate::config::PaginationConfig;
use crate::db::{create_test_pool, schema};

async fn app() -> Router {
    let pool = create_test_pool().await.expect("Failed to create test pool");
    schema::ensure_schema(&pool)
        .await
        .expect("Failed to create schema");
    build_router(AppState::new(pool, &PaginationConfig::default()))
}

async fn post(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Call one admin method and return its `result`, panicking on an RPC error.
async fn vt(app: &Router, method: &str, params: Value) -> Value {
    let (_, body) = post(
        app,
        "/v1/vt",
        json!({"jsonrpc": "2.0", "method": method, "params": params, "id": 1}),
    )
    .await;
    assert!(body.get("error").is_none(), "{} failed: {}", method, body);
    body["result"].clone()
}

async fn vt_error(app: &Router, method: &str, params: Value) -> Value {
    let (_, body) = post(
        app,
        "/v1/vt",
        json!({"jsonrpc": "2.0", "method": method, "params": params, "id": 1}),
    )
    .await;
    body["error"].clone()
}

async fn portal(app: &Router, method: &str, params: Value) -> Value {
    let (_, body) = post(
        app,
        "/v1/rpc",
        json!({"jsonrpc": "2.0", "method": method, "params": params, "id": 1}),
    )
    .await;
    assert!(body.get("error").is_none(), "{} failed: {}", method, body);
    body["result"].clone()
}

/// One category, one author, two tags and one news; returns their ids.
async fn seed(app: &Router) -> (i64, i64, Vec<i64>, i64) {
    let category = vt(
        app,
        "category.add",
        json!({"category": {"title": "World", "orderNumber": 1, "alias": "world", "statusId": 1}}),
    )
    .await;
    let author = vt(
        app,
        "author.add",
        json!({"author": {"name": "Ann Lee", "email": "ann@example.com", "statusId": 1}}),
    )
    .await;
    let mut tag_ids = Vec::new();
    for title in ["economy", "sport"] {
        let tag = vt(app, "tag.add", json!({"tag": {"title": title, "statusId": 1}})).await;
        tag_ids.push(tag["id"].as_i64().unwrap());
    }
    let news = vt(
        app,
        "news.add",
        json!({"news": {
            "title": "Markets rally",
            "foreword": "Stocks rose",
            "content": "Full story",
            "categoryId": category["id"],
            "authorId": author["id"],
            "tagIds": [tag_ids[1], tag_ids[0]],
            "publishedAt": "2024-05-01T09:30:00Z",
            "statusId": 1
        }}),
    )
    .await;
    (
        category["id"].as_i64().unwrap(),
        author["id"].as_i64().unwrap(),
        tag_ids,
        news["id"].as_i64().unwrap(),
    )
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(serde_json::from_slice::<Value>(&bytes).unwrap(), json!({"status": "ok"}));
}

#[tokio::test]
async fn test_admin_news_round_trip() {
    let app = app().await;
    let (category_id, author_id, tag_ids, news_id) = seed(&app).await;

    let news = vt(&app, "news.getByID", json!({"id": news_id})).await;
    assert_eq!(news["title"], json!("Markets rally"));
    assert_eq!(news["categoryId"], json!(category_id));
    assert_eq!(news["author"]["id"], json!(author_id));
    assert_eq!(news["category"]["alias"], json!("world"));
    assert_eq!(news["tagIds"], json!([tag_ids[1], tag_ids[0]]));
    assert_eq!(news["tags"][0]["title"], json!("sport"));
    assert_eq!(news["status"]["title"], json!("Published"));

    let list = vt(&app, "news.get", json!({"search": {"tagId": tag_ids[0]}})).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert!(list[0].get("foreword").is_none());
    assert_eq!(list[0]["tags"].as_array().unwrap().len(), 2);

    assert_eq!(vt(&app, "news.count", json!({})).await, json!(1));
    assert_eq!(vt(&app, "news.delete", json!({"id": news_id})).await, json!(true));
    assert_eq!(vt(&app, "news.count", Value::Null).await, json!(0));
}

#[tokio::test]
async fn test_admin_errors() {
    let app = app().await;
    seed(&app).await;

    let err = vt_error(
        &app,
        "category.add",
        json!({"category": {"title": "Again", "alias": "world", "statusId": 1}}),
    )
    .await;
    assert_eq!(err["code"], json!(400));
    assert_eq!(err["data"], json!([{"field": "alias", "error": "unique"}]));

    let err = vt_error(
        &app,
        "news.add",
        json!({"news": {
            "title": "Orphan",
            "foreword": "x",
            "categoryId": 999,
            "authorId": 999,
            "publishedAt": "2024-05-01T09:30:00Z",
            "statusId": 1
        }}),
    )
    .await;
    assert_eq!(
        err["data"],
        json!([
            {"field": "categoryId", "error": "incorrect"},
            {"field": "authorId", "error": "incorrect"}
        ])
    );

    let err = vt_error(&app, "tag.getByID", json!({"id": 999})).await;
    assert_eq!(err["code"], json!(404));

    let err = vt_error(&app, "tag.delete", json!({"id": "x"})).await;
    assert_eq!(err["code"], json!(-32602));

    let err = vt_error(&app, "comment.get", json!({})).await;
    assert_eq!(err["code"], json!(-32601));
}

#[tokio::test]
async fn test_admin_get_paging_and_sort() {
    let app = app().await;
    for title in ["b", "c", "a"] {
        vt(&app, "tag.add", json!({"tag": {"title": title, "statusId": 1}})).await;
    }

    let page = vt(
        &app,
        "tag.get",
        json!({"viewOps": {"page": 1, "pageSize": 2, "sortColumn": "title", "sortDesc": true}}),
    )
    .await;
    let titles: Vec<&str> = page.as_array().unwrap().iter().map(|t| t["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["c", "b"]);

    let unknown = vt(&app, "tag.get", json!({"viewOps": {"sortColumn": "nope"}})).await;
    let titles: Vec<&str> = unknown.as_array().unwrap().iter().map(|t| t["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_validate_does_not_write() {
    let app = app().await;
    let fields = vt(
        &app,
        "author.validate",
        json!({"author": {"name": "", "email": "not-an-email", "statusId": 7}}),
    )
    .await;
    assert_eq!(
        fields,
        json!([
            {"field": "name", "error": "required"},
            {"field": "email", "error": "format"},
            {"field": "statusId", "error": "incorrect"}
        ])
    );
    assert_eq!(vt(&app, "author.count", json!({})).await, json!(0));
}

#[tokio::test]
async fn test_portal_methods() {
    let app = app().await;
    let (category_id, _, tag_ids, news_id) = seed(&app).await;

    let news = portal(&app, "news.newsById", json!({"id": news_id})).await;
    assert_eq!(news["newsId"], json!(news_id));
    assert_eq!(news["content"], json!("Full story"));
    assert_eq!(news["author"]["name"], json!("Ann Lee"));
    assert_eq!(news["publishedAt"], json!("2024-05-01T09:30:00Z"));
    assert_eq!(news["tags"], json!([
        {"tagId": tag_ids[1], "title": "sport"},
        {"tagId": tag_ids[0], "title": "economy"}
    ]));

    assert_eq!(portal(&app, "news.newsById", json!({"id": 999})).await, Value::Null);

    let list = portal(&app, "news.newsWithFilters", json!({"categoryId": category_id})).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["category"]["categoryId"], json!(category_id));
    assert!(list[0].get("content").is_none());

    let count = portal(&app, "news.newsCountWithFilters", json!({"tagId": 999})).await;
    assert_eq!(count, json!(0));

    let categories = portal(&app, "news.categories", Value::Null).await;
    assert_eq!(categories, json!([{"categoryId": category_id, "title": "World", "orderNumber": 1, "alias": "world"}]));
    assert_eq!(portal(&app, "news.tags", Value::Null).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_batch_request() {
    let app = app().await;
    let (status, body) = post(
        &app,
        "/v1/rpc",
        json!([
            {"jsonrpc": "2.0", "method": "news.tags", "id": 1},
            {"jsonrpc": "2.0", "method": "news.nope", "id": 2}
        ]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["result"], json!([]));
    assert_eq!(body[1]["error"]["code"], json!(-32601));
}
