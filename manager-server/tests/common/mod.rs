//! Router harness over the in-memory backends

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use manager_server::api;
use manager_server::auth::TokenService;
use manager_server::db::MemoryStore;
use manager_server::state::AppState;
use manager_server::storage::MemoryObjectStore;

pub const SECRET: &[u8] = b"integration-test-secret-0123456789abcdef";
pub const BUCKET: &str = "test-bucket";
pub const PASSWORD: &str = "s3cret-pass";

const BOUNDARY: &str = "----manager-test-boundary";

pub struct TestApp {
    router: Router,
    pub objects: Arc<MemoryObjectStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let objects = Arc::new(MemoryObjectStore::new());
        let state = AppState::with_store(
            Arc::new(MemoryStore::new()),
            TokenService::new(SECRET),
            objects.clone(),
            BUCKET,
        );
        Self {
            router: api::create_router(state, Duration::from_secs(30)),
            objects,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    pub async fn call(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    /// Register an account and return its session token
    pub async fn register(&self, email: &str) -> String {
        let (status, body) = self
            .call(
                "POST",
                "/api/v1/auth",
                None,
                Some(json!({ "email": email, "password": PASSWORD, "action": "create" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register {email}: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Create a department and return its id as sent on the wire
    pub async fn department(&self, token: &str, name: &str) -> String {
        let (status, body) = self
            .call(
                "POST",
                "/api/v1/department",
                Some(token),
                Some(json!({ "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "department {name}: {body}");
        body["departmentId"].as_str().unwrap().to_string()
    }

    pub async fn upload(&self, token: &str, filename: &str, bytes: &[u8]) -> (StatusCode, Value) {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/file")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }
}

pub fn employee(identity: &str, department_id: &str) -> Value {
    json!({
        "identityNumber": identity,
        "name": "Jane Doe",
        "gender": "female",
        "departmentId": department_id,
        "employeeImageUri": "https://cdn.example.com/jane.png",
    })
}
