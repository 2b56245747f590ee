use super::*;

use std::collections::HashMap;

use axum::{
    extract::Query,
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::auth::{NoToken, StaticToken};

async fn echo(
    method: axum::http::Method,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    body: String,
) -> Json<Value> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    Json(json!({
        "method": method.as_str(),
        "authorization": header("authorization"),
        "content_type": header("content-type"),
        "x_trace": header("x-trace"),
        "query": query,
        "body": body,
    }))
}

async fn missing() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "code": "not_found", "message": "todo 9 does not exist" })),
    )
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable")
}

async fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn garbage() -> &'static str {
    "<html>not json</html>"
}

async fn spawn_echo_server() -> std::io::Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route(
            "/api/echo",
            get(echo).post(echo).put(echo).patch(echo).delete(echo),
        )
        .route("/api/missing", get(missing))
        .route("/api/broken", get(broken))
        .route("/api/empty", get(no_content))
        .route("/api/garbage", get(garbage));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}/api"))
}

#[derive(Debug, Deserialize)]
struct Echo {
    method: String,
    authorization: Option<String>,
    content_type: Option<String>,
    x_trace: Option<String>,
    query: HashMap<String, String>,
    body: String,
}

fn service(base: &str, token: Arc<dyn TokenSource>) -> ApiService {
    ApiService::new(ApiConfig::new(base), token).expect("service")
}

#[test]
fn joins_base_url_and_endpoint_with_single_slash() {
    let api = service("http://example.test/api/", Arc::new(NoToken));
    assert_eq!(api.url("/todos/1"), "http://example.test/api/todos/1");
    assert_eq!(api.url("todos"), "http://example.test/api/todos");
}

#[tokio::test]
async fn get_sends_bearer_token_and_json_content_type() {
    let base = spawn_echo_server().await.expect("server");
    let api = service(&base, Arc::new(StaticToken("secret-token".into())));

    let echo: Echo = api.get("echo", None).await.expect("get");

    assert_eq!(echo.method, "GET");
    assert_eq!(echo.authorization.as_deref(), Some("Bearer secret-token"));
    assert_eq!(echo.content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn omits_authorization_without_token() {
    let base = spawn_echo_server().await.expect("server");
    let api = service(&base, Arc::new(NoToken));

    let echo: Echo = api.delete("echo", None).await.expect("delete");

    assert_eq!(echo.method, "DELETE");
    assert_eq!(echo.authorization, None);
}

#[tokio::test]
async fn write_methods_send_json_body_with_options() {
    let base = spawn_echo_server().await.expect("server");
    let api = service(&base, Arc::new(NoToken));
    let options = RequestOptions::new()
        .header("x-trace", "t-1")
        .param("page", 2)
        .param("q", "milk");
    let payload = json!({ "title": "buy milk" });

    let posted: Echo = api.post("echo", Some(&payload), Some(&options)).await.expect("post");
    let put: Echo = api.put("echo", Some(&payload), None).await.expect("put");
    let patched: Echo = api.patch("echo", Some(&payload), None).await.expect("patch");

    assert_eq!(posted.method, "POST");
    assert_eq!(put.method, "PUT");
    assert_eq!(patched.method, "PATCH");
    assert_eq!(posted.x_trace.as_deref(), Some("t-1"));
    assert_eq!(posted.query.get("page").map(String::as_str), Some("2"));
    assert_eq!(posted.query.get("q").map(String::as_str), Some("milk"));
    let sent: Value = serde_json::from_str(&posted.body).expect("body json");
    assert_eq!(sent, payload);
    assert_eq!(posted.content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn maps_error_status_and_server_message() {
    let base = spawn_echo_server().await.expect("server");
    let api = service(&base, Arc::new(NoToken));

    let err = api.get::<Value>("missing", None).await.expect_err("must fail");
    assert_eq!(err.code, ErrorCode::NotFound);
    assert_eq!(err.status, Some(404));
    assert_eq!(err.message, "todo 9 does not exist");

    let err = api.get::<Value>("broken", None).await.expect_err("must fail");
    assert_eq!(err.code, ErrorCode::Internal);
    assert_eq!(err.message, "database unavailable");
}

#[tokio::test]
async fn empty_body_decodes_as_unit() {
    let base = spawn_echo_server().await.expect("server");
    let api = service(&base, Arc::new(NoToken));

    api.get::<()>("empty", None).await.expect("unit");
    let none: Option<Value> = api.get("empty", None).await.expect("option");
    assert!(none.is_none());
}

#[tokio::test]
async fn undecodable_body_is_a_decode_error() {
    let base = spawn_echo_server().await.expect("server");
    let api = service(&base, Arc::new(NoToken));

    let err = api.get::<Value>("garbage", None).await.expect_err("must fail");
    assert_eq!(err.code, ErrorCode::Decode);
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let api = service(&format!("http://{addr}"), Arc::new(NoToken));

    let err = api.get::<Value>("anything", None).await.expect_err("must fail");
    assert_eq!(err.code, ErrorCode::Network);
}
