use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::{JsonMap, NewWorkflow, WorkflowEntry, WorkflowKey, WorkflowStatus};

use super::{StoreError, WorkflowStore};

/// Process-local store, used when no `DATABASE_URL` is configured and by tests.
/// Contents are lost on restart.
#[derive(Default)]
pub struct MemoryWorkflowStore {
    entries: RwLock<Vec<WorkflowEntry>>,
}

impl MemoryWorkflowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn matches(entry: &WorkflowEntry, key: &WorkflowKey) -> bool {
    match key {
        WorkflowKey::Id(id) => entry.id == *id,
        WorkflowKey::CustomId(custom_id) => entry.custom_id.as_deref() == Some(custom_id),
    }
}

#[async_trait]
impl WorkflowStore for MemoryWorkflowStore {
    async fn list(&self) -> Result<Vec<WorkflowEntry>, StoreError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        // Stored in insertion order
        Ok(entries.iter().rev().cloned().collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<WorkflowEntry>, StoreError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.iter().find(|e| e.id == id).cloned())
    }

    async fn get_by_custom_id(
        &self,
        custom_id: &str,
    ) -> Result<Option<WorkflowEntry>, StoreError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries
            .iter()
            .find(|e| e.custom_id.as_deref() == Some(custom_id))
            .cloned())
    }

    async fn insert(&self, new: NewWorkflow) -> Result<WorkflowEntry, StoreError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(custom_id) = &new.custom_id {
            if entries
                .iter()
                .any(|e| e.custom_id.as_deref() == Some(custom_id.as_str()))
            {
                return Err(StoreError::DuplicateCustomId(custom_id.clone()));
            }
        }

        let now = Utc::now();
        let entry = WorkflowEntry {
            id: Uuid::now_v7(),
            custom_id: new.custom_id,
            timestamp: now,
            workflow_type: new.workflow_type,
            input_data: new.input_data,
            status: WorkflowStatus::Pending,
            outcome: None,
            updated_at: now,
        };
        entries.push(entry.clone());
        Ok(entry)
    }

    async fn update(
        &self,
        key: &WorkflowKey,
        status: WorkflowStatus,
        outcome: Option<JsonMap>,
    ) -> Result<Option<WorkflowEntry>, StoreError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        let Some(entry) = entries.iter_mut().find(|e| matches(e, key)) else {
            return Ok(None);
        };

        entry.status = status;
        if outcome.is_some() {
            entry.outcome = outcome;
        }
        entry.updated_at = Utc::now();
        Ok(Some(entry.clone()))
    }
}
