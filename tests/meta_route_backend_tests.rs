mod common;

use axum::http::StatusCode;
use common::{ADMIN_SECRET, AUTH_KEY, MockBackend, app_with_endpoint, body_json, post_json};
use metagate::server::API_VERSION;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower::ServiceExt;
use url::Url;

fn genres() -> Value {
    json!([
        { "id": "1", "name": "Action", "table": "genres", "schema": "public" },
        { "id": "2", "name": "RPG", "table": "genres", "schema": "public" }
    ])
}

#[tokio::test]
async fn query_returns_all_items_ordered_by_name() {
    let backend =
        MockBackend::spawn(|_| (StatusCode::OK, json!({ "data": { "meta_genres": genres() } })))
            .await;
    let app = app_with_endpoint(backend.endpoint.clone());

    let resp = app
        .oneshot(post_json(
            r#"{"type":"Query","table":"genres"}"#,
            Some(AUTH_KEY),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        json!({ "items": genres(), "table": "genres", "version": API_VERSION })
    );

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].query.contains("meta_genres(order_by: {name: asc})"));
    assert_eq!(calls[0].admin_secret.as_deref(), Some(ADMIN_SECRET));
}

#[tokio::test]
async fn unknown_type_falls_back_to_query() {
    let backend =
        MockBackend::spawn(|_| (StatusCode::OK, json!({ "data": { "meta_tags": [] } }))).await;
    let app = app_with_endpoint(backend.endpoint.clone());

    let resp = app
        .oneshot(post_json(r#"{"type":"List","table":"tags"}"#, Some(AUTH_KEY)))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        json!({ "items": [], "table": "tags", "version": API_VERSION })
    );
    assert!(!backend.calls()[0].query.contains("_iregex"));
}

#[tokio::test]
async fn search_wraps_the_pattern_in_wildcards() {
    let backend = MockBackend::spawn(|_| {
        (
            StatusCode::OK,
            json!({ "data": { "meta_tags": [{ "id": 5, "name": "Roguelike" }] } }),
        )
    })
    .await;
    let app = app_with_endpoint(backend.endpoint.clone());

    let resp = app
        .oneshot(post_json(
            r#"{"type":"Search","table":"tags","query":"rogue"}"#,
            Some(AUTH_KEY),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        json!({
            "items": [{ "id": "5", "name": "Roguelike" }],
            "table": "tags",
            "version": API_VERSION
        })
    );
    assert!(backend.calls()[0]
        .query
        .contains(r#"where: {name: {_iregex: ".*rogue.*"}}"#));
}

#[tokio::test]
async fn insert_of_an_existing_name_fails_with_already_exists() {
    let backend = MockBackend::spawn(|query| {
        if query.contains("insert_meta_") {
            return (
                StatusCode::OK,
                json!({ "data": { "insert_meta_genres_one": { "name": "RPG" } } }),
            );
        }
        (
            StatusCode::OK,
            json!({ "data": { "meta_genres": [{ "id": "2", "name": "rpg" }] } }),
        )
    })
    .await;
    let app = app_with_endpoint(backend.endpoint.clone());

    let resp = app
        .oneshot(post_json(
            r#"{"type":"Insert","table":"genres","data":{"name":"RPG","table":"genres","schema":"public"}}"#,
            Some(AUTH_KEY),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(resp).await;
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|e| e.contains("already exists"))
    );
    assert_eq!(body["table"], "genres");
    assert_eq!(body["location"], "Insert");
    assert_eq!(body["version"], API_VERSION);
    assert_eq!(backend.calls().len(), 1);
}

#[tokio::test]
async fn insert_of_a_new_name_returns_saved() {
    let backend = MockBackend::spawn(|query| {
        if query.contains("insert_meta_genres_one") {
            (
                StatusCode::OK,
                json!({ "data": { "insert_meta_genres_one": { "name": "Roguelike" } } }),
            )
        } else {
            // Substring hit that is not the same name.
            (
                StatusCode::OK,
                json!({ "data": { "meta_genres": [{ "id": "9", "name": "Roguelike Deckbuilder" }] } }),
            )
        }
    })
    .await;
    let app = app_with_endpoint(backend.endpoint.clone());

    let resp = app
        .oneshot(post_json(
            r#"{"type":"Insert","table":"genres","data":{"name":"Roguelike","table":"genres","schema":"public"}}"#,
            Some(AUTH_KEY),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        json!({
            "saved": "Roguelike",
            "table": "genres",
            "location": "Insert",
            "version": API_VERSION
        })
    );

    let calls = backend.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].query.contains("_iregex"));
    assert!(calls[1].query.contains(r#"name: "Roguelike""#));
    assert!(calls.iter().all(|c| c.admin_secret.as_deref() == Some(ADMIN_SECRET)));
}

#[tokio::test]
async fn update_returns_the_updated_name() {
    let backend = MockBackend::spawn(|_| {
        (
            StatusCode::OK,
            json!({ "data": { "update_meta_platforms": { "returning": [{ "name": "Switch 2" }] } } }),
        )
    })
    .await;
    let app = app_with_endpoint(backend.endpoint.clone());

    let resp = app
        .oneshot(post_json(
            r#"{"type":"Update","table":"platforms","data":{"id":"p-1","name":"Switch 2","table":"platforms","schema":"public"}}"#,
            Some(AUTH_KEY),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        json!({
            "updated": "Switch 2",
            "table": "platforms",
            "location": "Update",
            "version": API_VERSION
        })
    );
    assert!(backend.calls()[0]
        .query
        .contains(r#"where: {id: {_eq: "p-1"}}"#));
}

#[tokio::test]
async fn update_of_an_unknown_id_is_a_server_error() {
    let backend = MockBackend::spawn(|_| {
        (
            StatusCode::OK,
            json!({ "data": { "update_meta_platforms": { "returning": [] } } }),
        )
    })
    .await;
    let app = app_with_endpoint(backend.endpoint.clone());

    let resp = app
        .oneshot(post_json(
            r#"{"type":"Update","table":"platforms","data":{"id":"missing","name":"X","table":"platforms","schema":"public"}}"#,
            Some(AUTH_KEY),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(resp).await;
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|e| e.contains("no record with id `missing`"))
    );
}

#[tokio::test]
async fn graphql_errors_are_returned_with_the_query() {
    let backend = MockBackend::spawn(|_| {
        (
            StatusCode::OK,
            json!({ "errors": [{
                "extensions": { "path": "$.selectionSet.meta_tags", "code": "validation-failed" },
                "message": "field 'meta_tags' not found in type: 'query_root'"
            }] }),
        )
    })
    .await;
    let app = app_with_endpoint(backend.endpoint.clone());

    let resp = app
        .oneshot(post_json(r#"{"type":"Query","table":"tags"}"#, Some(AUTH_KEY)))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(resp).await;
    let error = body["error"].as_str().expect("error message");
    assert!(error.starts_with("(query_meta_items) - tags:"));
    assert!(error.contains("$.selectionSet.meta_tags: field 'meta_tags' not found"));
    assert!(error.contains("meta_tags(order_by: {name: asc})"));
    assert_eq!(body["location"], "Query");
}

#[tokio::test]
async fn failure_of_an_unknown_type_echoes_the_raw_type_as_location() {
    let backend = MockBackend::spawn(|_| {
        (
            StatusCode::OK,
            json!({ "errors": [{ "message": "relation is gone" }] }),
        )
    })
    .await;
    let app = app_with_endpoint(backend.endpoint.clone());

    let resp = app
        .oneshot(post_json(r#"{"type":"List","table":"tags"}"#, Some(AUTH_KEY)))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(resp).await;
    assert_eq!(body["location"], "List");
    assert_eq!(body["table"], "tags");
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|e| e.starts_with("(query_meta_items) - tags:"))
    );
}

#[tokio::test]
async fn non_json_upstream_failure_is_a_server_error() {
    let backend = MockBackend::spawn(|_| {
        (
            StatusCode::BAD_GATEWAY,
            Value::String("upstream down".to_string()),
        )
    })
    .await;
    let app = app_with_endpoint(backend.endpoint.clone());

    let resp = app
        .oneshot(post_json(r#"{"type":"Query","table":"tags"}"#, Some(AUTH_KEY)))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(resp).await;
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|e| e.contains("upstream returned 502 Bad Gateway"))
    );
}

#[tokio::test]
async fn unreachable_backend_is_a_server_error() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind");
    let addr = listener.local_addr().expect("no address");
    drop(listener);

    let endpoint = Url::parse(&format!("http://{addr}/v1/graphql")).expect("invalid url");
    let app = app_with_endpoint(endpoint);

    let resp = app
        .oneshot(post_json(r#"{"type":"Query","table":"tags"}"#, Some(AUTH_KEY)))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(resp).await;
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|e| e.starts_with("HTTP request error"))
    );
    assert_eq!(body["table"], "tags");
}
