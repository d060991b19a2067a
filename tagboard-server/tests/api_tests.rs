// Integration tests for the hashtag HTTP API
// These drive the router in-process, without binding a socket

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tagboard_server::{api, config::Limits, hashtag::TagLinker, state::AppState};
use tower::ServiceExt;

fn test_app() -> Router {
    api::router(AppState::new(
        TagLinker::default(),
        Limits {
            max_text_bytes: 256,
            max_batch: 3,
        },
    ))
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, uri, Body::from(body.to_string())).await
}

async fn send(app: Router, uri: &str, body: Body) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health_check() {
    let response = test_app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn test_extract_endpoint() {
    let (status, body) = post_json(
        test_app(),
        "/hashtags/extract",
        json!({"text": "Testing #JavaScript #東京 #🚀 #javascript development"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"key": "javascript", "display": "JavaScript"},
            {"key": "東京", "display": "東京"},
            {"key": "🚀", "display": "🚀"}
        ])
    );
}

#[tokio::test]
async fn test_extract_null_and_missing_text() {
    let (status, body) = post_json(test_app(), "/hashtags/extract", json!({"text": null})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = post_json(test_app(), "/hashtags/extract", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_linkify_endpoint() {
    let (status, body) = post_json(
        test_app(),
        "/hashtags/linkify",
        json!({"text": "Testing #JavaScript #東京 #🚀 development"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            "Testing ",
            {"type": "link", "text": "#JavaScript", "href": "/tags/javascript"},
            " ",
            {"type": "link", "text": "#東京", "href": "/tags/%E6%9D%B1%E4%BA%AC"},
            " ",
            {"type": "link", "text": "#🚀", "href": "/tags/%F0%9F%9A%80"},
            " development"
        ])
    );
}

#[tokio::test]
async fn test_linkify_uses_configured_base() {
    let app = api::router(AppState::new(
        TagLinker::new("/explore/"),
        Limits {
            max_text_bytes: 256,
            max_batch: 3,
        },
    ));

    let (status, body) = post_json(app, "/hashtags/linkify", json!({"text": "#Rust!"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"type": "link", "text": "#Rust", "href": "/explore/rust"},
            "!"
        ])
    );
}

#[tokio::test]
async fn test_normalize_endpoint() {
    let (status, body) = post_json(
        test_app(),
        "/hashtags/normalize",
        json!({"tag": "ＨｅｌｌｏＷｏｒｌｄ"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"key": "helloworld"}));

    let (status, body) = post_json(test_app(), "/hashtags/normalize", json!({"tag": "#"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"key": null}));
}

#[tokio::test]
async fn test_batch_endpoint() {
    let (status, body) = post_json(
        test_app(),
        "/hashtags/batch",
        json!({"texts": ["#Rust rocks", null, "no tags"]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {
                "hashtags": [{"key": "rust", "display": "Rust"}],
                "segments": [
                    {"type": "link", "text": "#Rust", "href": "/tags/rust"},
                    " rocks"
                ]
            },
            {"hashtags": [], "segments": []},
            {"hashtags": [], "segments": ["no tags"]}
        ])
    );
}

#[tokio::test]
async fn test_batch_limit() {
    let (status, body) = post_json(
        test_app(),
        "/hashtags/batch",
        json!({"texts": ["a", "b", "c", "d"]}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
}

#[tokio::test]
async fn test_text_length_limit() {
    let text = "x".repeat(257);
    let (status, body) = post_json(test_app(), "/hashtags/extract", json!({"text": text})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
    assert!(body["details"].as_str().unwrap().contains("257"));
}

#[tokio::test]
async fn test_malformed_json() {
    let (status, body) = send(test_app(), "/hashtags/extract", Body::from("{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
}

#[tokio::test]
async fn test_unknown_route() {
    let (status, body) = post_json(test_app(), "/hashtags/unknown", json!({})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
}
