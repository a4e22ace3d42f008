//! End-to-end tests for the assembled application
//!
//! The full router (sessions, CSRF, static serving, health) runs over the
//! in-memory task repository. A small cookie jar carries cookies between
//! requests the way a browser would.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use core_config::{AppInfo, Environment, server::ServerConfig, session::SessionConfig};
use database::postgres::PostgresConfig;
use domain_tasks::{InMemoryTaskRepository, Task, TaskService};
use domain_users::{UserDirectory, UserInfo};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::path::PathBuf;
use todo_api::config::Config;
use todo_api::{api, build_app};
use tower::ServiceExt;

fn test_config() -> Config {
    Config {
        app: AppInfo {
            name: "todo_api",
            version: "test",
        },
        database: PostgresConfig::new("postgresql://unused/todo"),
        server: ServerConfig::default(),
        session: SessionConfig::new("e2e secret", false),
        environment: Environment::Development,
        admin_users: vec!["Jane".to_string()],
        static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures"),
    }
}

async fn app() -> Router {
    let tasks = TaskService::new(InMemoryTaskRepository::new());
    tasks.seed_if_empty().await.unwrap();

    let config = test_config();
    build_app(&config, api::routes(tasks, UserDirectory::new(config.admin_users.clone())))
}

async fn json_body(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Browser stand-in: keeps cookies and echoes the CSRF token.
struct Client {
    app: Router,
    cookies: BTreeMap<String, String>,
}

impl Client {
    async fn new() -> Self {
        Self {
            app: app().await,
            cookies: BTreeMap::new(),
        }
    }

    fn csrf_token(&self) -> Option<&String> {
        self.cookies.get("XSRF-TOKEN")
    }

    async fn send(&mut self, mut request: Request<Body>) -> Response {
        if !self.cookies.is_empty() {
            let cookie = self
                .cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; ");
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.app.clone().oneshot(request).await.unwrap();

        for value in response.headers().get_all(header::SET_COOKIE) {
            let pair = value.to_str().unwrap().split(';').next().unwrap();
            if let Some((name, value)) = pair.split_once('=') {
                self.cookies.insert(name.to_string(), value.to_string());
            }
        }

        response
    }

    async fn get(&mut self, uri: &str) -> Response {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    /// POST/PUT/DELETE with the CSRF header set from the cookie.
    async fn write(&mut self, method: &str, uri: &str, body: Value) -> Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = self.csrf_token() {
            builder = builder.header("x-xsrf-token", token.as_str());
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }
}

#[tokio::test]
async fn test_seeded_tasks_list_incomplete_first() {
    let mut client = Client::new().await;

    let response = client.get("/api/tasks?order_by=completed_asc&limit=20").await;
    assert_eq!(response.status(), StatusCode::OK);

    let tasks: Vec<Task> = serde_json::from_value(json_body(response).await).unwrap();
    assert_eq!(tasks.len(), 5);
    assert_eq!(tasks.iter().filter(|t| t.completed).count(), 2);
    let completed: Vec<bool> = tasks.iter().map(|t| t.completed).collect();
    assert_eq!(completed, [false, false, false, true, true]);
}

#[tokio::test]
async fn test_every_api_response_sets_csrf_cookie() {
    let mut client = Client::new().await;

    let response = client.get("/api/currentUser").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(json_body(response).await.is_null());
    assert!(client.csrf_token().is_some());
}

#[tokio::test]
async fn test_anonymous_requests_do_not_start_sessions() {
    let app = app().await;

    for _ in 0..50 {
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/api/currentUser").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let cookies: Vec<&str> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        assert!(cookies.iter().any(|c| c.starts_with("XSRF-TOKEN=")));
        assert!(!cookies.iter().any(|c| c.starts_with("todo.sid=")));
    }
}

#[tokio::test]
async fn test_user_id_is_stable_across_sessions() {
    let mut ids = Vec::new();
    for _ in 0..2 {
        let mut client = Client::new().await;
        client.get("/api/currentUser").await;

        let response = client
            .write("POST", "/api/signIn", json!({ "username": "Steve" }))
            .await;
        let user: UserInfo = serde_json::from_value(json_body(response).await).unwrap();
        ids.push(user.id);
    }

    assert_eq!(ids[0], ids[1]);
}

#[tokio::test]
async fn test_write_without_csrf_header_is_forbidden() {
    let mut client = Client::new().await;
    client.get("/api/currentUser").await;

    let response = client
        .send(
            Request::builder()
                .method("POST")
                .uri("/api/tasks")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "title": "sneaky" }).to_string()))
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(response).await["error"], "CSRF_TOKEN_MISMATCH");

    let response = client.get("/api/tasks/count").await;
    assert_eq!(json_body(response).await["count"], 5);
}

#[tokio::test]
async fn test_sign_in_bulk_update_and_sign_out() {
    let mut client = Client::new().await;
    client.get("/api/currentUser").await;

    let response = client
        .write("POST", "/api/TasksController/setAll", json!({ "completed": true }))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = client
        .write("POST", "/api/signIn", json!({ "username": "Jane" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let user: UserInfo = serde_json::from_value(json_body(response).await).unwrap();
    assert!(user.is_admin());

    let response = client
        .write("POST", "/api/TasksController/setAll", json!({ "completed": true }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["updated"], 5);

    let response = client.get("/api/tasks?completed=false").await;
    assert_eq!(json_body(response).await, json!([]));

    let response = client.write("POST", "/api/signOut", json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({}));

    let response = client.get("/api/currentUser").await;
    assert!(json_body(response).await.is_null());
}

#[tokio::test]
async fn test_non_admin_bulk_update_is_forbidden() {
    let mut client = Client::new().await;
    client.get("/api/currentUser").await;

    let response = client
        .write("POST", "/api/signIn", json!({ "username": "Steve" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .write("POST", "/api/TasksController/setAll", json!({ "completed": false }))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = client.get("/api/tasks?completed=true").await;
    let tasks = json_body(response).await;
    assert_eq!(tasks.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_task_crud_through_full_stack() {
    let mut client = Client::new().await;
    client.get("/api/currentUser").await;

    let response = client
        .write("POST", "/api/tasks", json!({ "title": "Task f" }))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let task: Task = serde_json::from_value(json_body(response).await).unwrap();

    let response = client
        .write("DELETE", &format!("/api/tasks/{}", task.id), json!(null))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client
        .write("DELETE", &format!("/api/tasks/{}", task.id), json!(null))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_api_path_is_json_404() {
    let mut client = Client::new().await;

    let response = client.get("/api/nothing/here").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_client_routes_fall_back_to_index() {
    let mut client = Client::new().await;

    let response = client.get("/tasks/some/client/route").await;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&bytes).contains(r#"<div id="root">"#));
}

#[tokio::test]
async fn test_health_and_openapi() {
    let mut client = Client::new().await;

    let response = client.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "healthy");

    let response = client.get("/api-docs/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);
    let doc = json_body(response).await;
    assert!(doc["paths"]["/TasksController/setAll"].is_object());
}
