//! Integration tests for `Client` and `HyperClient` using wiremock.

use std::time::Duration;

use restwire::{
    Client, ClientConfig, HttpClient, HyperClient, Method, Params, Request, StatusCode,
};
use serde::{Deserialize, Serialize};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, body_string, body_string_contains, header, method, path, query_param},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct User {
    id: u64,
    name: String,
}

fn client_for(server: &MockServer) -> Client {
    Client::builder()
        .base_url(server.uri())
        .build()
        .expect("client")
}

#[tokio::test]
async fn test_get_with_path_segments() {
    let mock_server = MockServer::start().await;

    let user = User {
        id: 42,
        name: "Alice".to_string(),
    };

    Mock::given(method("GET"))
        .and(path("/users/42/posts/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&user))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let request = Request::builder(Method::Get, "/users/:id/posts/:id2")
        .segment("id", "42")
        .segment("id2", "7")
        .build()
        .expect("request");

    let response = client.execute(request).await.expect("response");

    assert!(response.is_success());
    let body: User = response.json().expect("json");
    assert_eq!(body, user);
}

#[tokio::test]
async fn test_query_order_and_duplicates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(|req: &wiremock::Request| req.url.query() == Some("a=1&b=2&a=3"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let request = Request::builder(Method::Get, "/search")
        .query("a", "1")
        .query("b", "2")
        .query("a", "3")
        .build()
        .expect("request");

    let response = client.execute(request).await.expect("response");
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_get_sends_no_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .and(body_string(""))
        .and(|req: &wiremock::Request| !req.headers.contains_key("content-type"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let request = Request::builder(Method::Get, "/items")
        .form_field("ignored", "1")
        .body("text/plain", "ignored")
        .build()
        .expect("request");

    let response = client.execute(request).await.expect("response");
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_post_json_body() {
    let mock_server = MockServer::start().await;

    let input = User {
        id: 0,
        name: "Bob".to_string(),
    };

    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("Content-Type", "application/json; charset=utf-8"))
        .and(body_json(&input))
        .respond_with(ResponseTemplate::new(201))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let request = Request::builder(Method::Post, "/users")
        .json(&input)
        .form_field("dropped", "because the body wins")
        .build()
        .expect("request");

    let response = client.execute(request).await.expect("response");
    assert_eq!(response.status(), 201);
}

#[tokio::test]
async fn test_urlencoded_form() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string("x=1+2&y=a%26b"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let request = Request::builder(Method::Post, "/login")
        .form_field("x", "1 2")
        .form_field("y", "a&b")
        .build()
        .expect("request");

    let response = client.execute(request).await.expect("response");
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_multipart_with_file_on_disk() {
    let mock_server = MockServer::start().await;

    let dir = tempfile::tempdir().expect("tempdir");
    let file_path = dir.path().join("notes.txt");
    std::fs::write(&file_path, "line one\nline two\n").expect("write");

    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(header("Content-Type", "multipart/form-data; boundary=restwire-test"))
        .and(body_string_contains(
            "Content-Disposition: form-data; name=\"title\"\r\n\r\nmy notes\r\n",
        ))
        .and(body_string_contains(
            "Content-Disposition: form-data; name=\"doc\"; filename=\"notes.txt\"\r\n\
             Content-Type: text/plain\r\n\r\nline one\nline two\n\r\n",
        ))
        .and(body_string_contains("--restwire-test--\r\n"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let request = Request::builder(Method::Post, "/upload")
        .form_field("title", "my notes")
        .file_path("doc", &file_path)
        .boundary("restwire-test")
        .build()
        .expect("request");

    let response = client.execute(request).await.expect("response");
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_missing_file_fails_before_sending() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let file_path = dir.path().join("vanishing.bin");
    std::fs::write(&file_path, [1_u8, 2, 3]).expect("write");

    let request = Request::builder(Method::Post, "/upload")
        .file_path("blob", &file_path)
        .build()
        .expect("request");
    std::fs::remove_file(&file_path).expect("remove");

    let err = client_for(&mock_server)
        .execute(request)
        .await
        .expect_err("file is gone");
    assert!(err.is_file_access(), "expected file access error, got: {err}");
}

#[tokio::test]
async fn test_headers_cookies_and_defaults() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("X-Api-Key", "secret"))
        .and(header("Cookie", "session=abc; theme=dark"))
        .and(|req: &wiremock::Request| {
            let accept: Vec<_> = req.headers.get_all("accept").iter().collect();
            accept == ["application/json", "text/html"]
        })
        .and(header("User-Agent", "restwire-tests/1.0"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .base_url(mock_server.uri())
        .default_header("Accept", "application/json")
        .default_header("X-Api-Key", "secret")
        .config(ClientConfig::builder().user_agent("restwire-tests/1.0").build())
        .with_logging()
        .build()
        .expect("client");

    let request = Request::builder(Method::Get, "/me")
        .header("Accept", "text/html")
        .cookie("session", "abc")
        .cookie("theme", "dark")
        .build()
        .expect("request");

    let response = client.execute(request).await.expect("response");
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_explicit_content_type_header_wins() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/data"))
        .and(header("Content-Type", "text/csv"))
        .and(body_string("a=1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let request = Request::builder(Method::Put, "/data")
        .header("Content-Type", "text/csv")
        .form_field("a", "1")
        .build()
        .expect("request");

    let response = client.execute(request).await.expect("response");
    assert_eq!(response.status(), 204);
}

#[derive(Params)]
struct Paging {
    #[param(query = "page")]
    page: u32,
    #[param(query = "per_page")]
    per_page: u32,
}

#[derive(Params)]
struct ListPosts {
    #[param(path = "user")]
    user: String,
    #[param(query("tag", required))]
    tags: Vec<String>,
    #[param(header = "X-Request-Id")]
    request_id: Option<String>,
    #[param(flatten)]
    paging: Paging,
}

#[tokio::test]
async fn test_client_helpers_with_derived_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/ann/posts"))
        .and(|req: &wiremock::Request| req.url.query() == Some("tag=rust&tag=http&page=2"))
        .and(header("X-Request-Id", "r-1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/users/ann/posts"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let params = ListPosts {
        user: "ann".to_string(),
        tags: vec!["rust".to_string(), "http".to_string()],
        request_id: Some("r-1".to_string()),
        paging: Paging {
            page: 2,
            per_page: 0,
        },
    };

    let response = client
        .get("/users/:user/posts", &params)
        .await
        .expect("get");
    assert_eq!(response.status(), 200);

    let response = client
        .delete("/users/:user/posts", &params)
        .await
        .expect("delete");
    assert_eq!(response.status(), 204);
}

#[tokio::test]
async fn test_http_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/not-found"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let request = Request::builder(Method::Get, "/not-found")
        .build()
        .expect("request");

    let response = client.execute(request).await.expect("response");
    assert!(response.is_client_error());

    let err = response.error_for_status().expect_err("404");
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(err.body().map(bytes::Bytes::as_ref), Some(b"Not Found".as_ref()));
}

#[tokio::test]
async fn test_absolute_resource_replaces_base() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/elsewhere"))
        .and(query_param("x", "1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .base_url("http://unused.invalid/api")
        .build()
        .expect("client");
    let request = Request::builder(Method::Get, format!("{}/elsewhere", mock_server.uri()))
        .query("x", "1")
        .build()
        .expect("request");

    let response = client.execute(request).await.expect("response");
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .base_url(mock_server.uri())
        .config(
            ClientConfig::builder()
                .timeout(Duration::from_millis(100))
                .build(),
        )
        .build()
        .expect("client");
    let request = Request::builder(Method::Get, "/slow")
        .build()
        .expect("request");

    let err = client.execute(request).await.expect_err("timeout");
    assert!(err.is_timeout(), "Expected timeout error, got: {err}");
}

#[tokio::test]
async fn test_connection_error() {
    let client = HyperClient::new();
    let request = http::Request::get("http://127.0.0.1:1/")
        .body(bytes::Bytes::new())
        .expect("request");

    let err = client.execute(request).await.expect_err("connection");
    assert!(err.is_connection(), "Expected connection error, got: {err}");
}
