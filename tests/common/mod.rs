use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

use workflow_tracker::config::Config;
use workflow_tracker::db::{MemoryWorkflowStore, StoreError, WorkflowStore};
use workflow_tracker::models::{JsonMap, NewWorkflow, WorkflowEntry, WorkflowKey, WorkflowStatus};

/// A running test server instance.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Create a workflow through the webhook, return (body, status).
    pub async fn create_workflow(&self, body: &Value) -> (Value, StatusCode) {
        self.post(self.url("/api/workflows").as_str(), body).await
    }

    /// Create a workflow that must succeed, return its `data` object.
    pub async fn create_ok(&self, workflow_type: &str, input: Value) -> Value {
        let (body, status) = self
            .create_workflow(&json!({ "type": workflow_type, "inputData": input }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create workflow failed: {body}");
        body["data"].clone()
    }

    pub async fn update_workflow(&self, id: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .put(self.url(&format!("/api/workflows/{id}")))
            .json(body)
            .send()
            .await
            .expect("update request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn get(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    async fn post(&self, url: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Send a raw body with a JSON content type.
    pub async fn send_raw(&self, method: reqwest::Method, path: &str, raw: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .request(method, self.url(path))
            .header("content-type", "application/json")
            .body(raw.to_string())
            .send()
            .await
            .expect("raw request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: None,
        db_max_connections: 1,
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        max_body_size: 64 * 1024,
        cors_origins: vec![],
        log_level: "warn".to_string(),
    }
}

/// Spawn a test app backed by a fresh in-memory store.
#[allow(dead_code)]
pub async fn spawn_app() -> (TestApp, Arc<MemoryWorkflowStore>) {
    let store = Arc::new(MemoryWorkflowStore::new());
    let app = spawn_app_with_store(store.clone()).await;
    (app, store)
}

pub async fn spawn_app_with_store(store: Arc<dyn WorkflowStore>) -> TestApp {
    let app = workflow_tracker::build_app(store, test_config());

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
    }
}

/// Store whose every call fails as if the database were unreachable.
#[allow(dead_code)]
pub struct FailingStore;

#[async_trait]
impl WorkflowStore for FailingStore {
    async fn list(&self) -> Result<Vec<WorkflowEntry>, StoreError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn get_by_id(&self, _id: Uuid) -> Result<Option<WorkflowEntry>, StoreError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn get_by_custom_id(&self, _custom_id: &str) -> Result<Option<WorkflowEntry>, StoreError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn insert(&self, _new: NewWorkflow) -> Result<WorkflowEntry, StoreError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn update(
        &self,
        _key: &WorkflowKey,
        _status: WorkflowStatus,
        _outcome: Option<JsonMap>,
    ) -> Result<Option<WorkflowEntry>, StoreError> {
        Err(sqlx::Error::PoolTimedOut.into())
    }
}

/// Store that panics on listing; everything else behaves like the memory store.
#[allow(dead_code)]
#[derive(Default)]
pub struct PanickingStore {
    inner: MemoryWorkflowStore,
}

#[async_trait]
impl WorkflowStore for PanickingStore {
    async fn list(&self) -> Result<Vec<WorkflowEntry>, StoreError> {
        panic!("list exploded");
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<WorkflowEntry>, StoreError> {
        self.inner.get_by_id(id).await
    }

    async fn get_by_custom_id(&self, custom_id: &str) -> Result<Option<WorkflowEntry>, StoreError> {
        self.inner.get_by_custom_id(custom_id).await
    }

    async fn insert(&self, new: NewWorkflow) -> Result<WorkflowEntry, StoreError> {
        self.inner.insert(new).await
    }

    async fn update(
        &self,
        key: &WorkflowKey,
        status: WorkflowStatus,
        outcome: Option<JsonMap>,
    ) -> Result<Option<WorkflowEntry>, StoreError> {
        self.inner.update(key, status, outcome).await
    }
}
