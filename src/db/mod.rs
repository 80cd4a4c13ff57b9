pub mod memory;
pub mod workflows;

use std::fmt;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{JsonMap, NewWorkflow, WorkflowEntry, WorkflowKey, WorkflowStatus};

pub use memory::MemoryWorkflowStore;
pub use workflows::PgWorkflowStore;

#[derive(Debug)]
pub enum StoreError {
    /// Another entry already holds this `custom_id`.
    DuplicateCustomId(String),
    Database(sqlx::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::DuplicateCustomId(custom_id) => {
                write!(f, "Duplicate custom_id: {custom_id}")
            }
            StoreError::Database(err) => write!(f, "Database error: {err}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err)
    }
}

/// Persistence for workflow entries. Each call is a single round trip.
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// All entries, newest first.
    async fn list(&self) -> Result<Vec<WorkflowEntry>, StoreError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<WorkflowEntry>, StoreError>;

    async fn get_by_custom_id(&self, custom_id: &str)
        -> Result<Option<WorkflowEntry>, StoreError>;

    /// Inserts with `status = pending`; the store assigns `id` and `timestamp`.
    async fn insert(&self, new: NewWorkflow) -> Result<WorkflowEntry, StoreError>;

    /// Sets `status` and, when given, replaces `outcome` wholesale.
    /// Returns `None` when no entry matches `key`.
    async fn update(
        &self,
        key: &WorkflowKey,
        status: WorkflowStatus,
        outcome: Option<JsonMap>,
    ) -> Result<Option<WorkflowEntry>, StoreError>;
}
