use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{JsonMap, NewWorkflow, WorkflowEntry, WorkflowKey, WorkflowRow, WorkflowStatus};

use super::{StoreError, WorkflowStore};

const COLUMNS: &str =
    "id, custom_id, created_at, updated_at, type, input_data, status, outcome";

pub async fn list(pool: &PgPool) -> Result<Vec<WorkflowRow>, sqlx::Error> {
    sqlx::query_as::<_, WorkflowRow>(&format!(
        "SELECT {COLUMNS} FROM workflows ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<WorkflowRow>, sqlx::Error> {
    sqlx::query_as::<_, WorkflowRow>(&format!("SELECT {COLUMNS} FROM workflows WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_custom_id(
    pool: &PgPool,
    custom_id: &str,
) -> Result<Option<WorkflowRow>, sqlx::Error> {
    sqlx::query_as::<_, WorkflowRow>(&format!(
        "SELECT {COLUMNS} FROM workflows WHERE custom_id = $1"
    ))
    .bind(custom_id)
    .fetch_optional(pool)
    .await
}

pub async fn create(pool: &PgPool, new: &NewWorkflow) -> Result<WorkflowRow, sqlx::Error> {
    sqlx::query_as::<_, WorkflowRow>(&format!(
        "INSERT INTO workflows (id, custom_id, type, input_data, status)
         VALUES ($1, $2, $3, $4::json, 'pending') RETURNING {COLUMNS}"
    ))
    .bind(Uuid::now_v7())
    .bind(new.custom_id.as_deref())
    .bind(new.workflow_type.as_str())
    .bind(to_json_text(&new.input_data)?)
    .fetch_one(pool)
    .await
}

/// `outcome = None` leaves the stored outcome untouched.
pub async fn update_status(
    pool: &PgPool,
    key: &WorkflowKey,
    status: WorkflowStatus,
    outcome: Option<&JsonMap>,
) -> Result<Option<WorkflowRow>, sqlx::Error> {
    let outcome = outcome.map(to_json_text).transpose()?;
    let filter = match key {
        WorkflowKey::Id(_) => "id = $1",
        WorkflowKey::CustomId(_) => "custom_id = $1",
    };

    let sql = format!(
        "UPDATE workflows SET status = $2, outcome = COALESCE($3::json, outcome), updated_at = now()
         WHERE {filter} RETURNING {COLUMNS}"
    );
    let query = sqlx::query_as::<_, WorkflowRow>(&sql);
    let query = match key {
        WorkflowKey::Id(id) => query.bind(*id),
        WorkflowKey::CustomId(custom_id) => query.bind(custom_id.as_str()),
    };

    query
        .bind(status.as_str())
        .bind(outcome)
        .fetch_optional(pool)
        .await
}

// Payloads go over the wire as text cast to `json`; a `jsonb` parameter
// would reorder keys before they reach the column.
fn to_json_text(map: &JsonMap) -> Result<String, sqlx::Error> {
    serde_json::to_string(map).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

fn into_entry(row: WorkflowRow) -> Result<WorkflowEntry, StoreError> {
    WorkflowEntry::try_from(row).map_err(|e| StoreError::Database(sqlx::Error::Decode(e.into())))
}

/// `WorkflowStore` backed by the Postgres `workflows` table.
#[derive(Clone)]
pub struct PgWorkflowStore {
    pub pool: PgPool,
}

impl PgWorkflowStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkflowStore for PgWorkflowStore {
    async fn list(&self) -> Result<Vec<WorkflowEntry>, StoreError> {
        list(&self.pool).await?.into_iter().map(into_entry).collect()
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<WorkflowEntry>, StoreError> {
        find_by_id(&self.pool, id).await?.map(into_entry).transpose()
    }

    async fn get_by_custom_id(
        &self,
        custom_id: &str,
    ) -> Result<Option<WorkflowEntry>, StoreError> {
        find_by_custom_id(&self.pool, custom_id)
            .await?
            .map(into_entry)
            .transpose()
    }

    async fn insert(&self, new: NewWorkflow) -> Result<WorkflowEntry, StoreError> {
        let row = create(&self.pool, &new).await.map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                StoreError::DuplicateCustomId(new.custom_id.clone().unwrap_or_default())
            }
            _ => StoreError::Database(e),
        })?;
        into_entry(row)
    }

    async fn update(
        &self,
        key: &WorkflowKey,
        status: WorkflowStatus,
        outcome: Option<JsonMap>,
    ) -> Result<Option<WorkflowEntry>, StoreError> {
        update_status(&self.pool, key, status, outcome.as_ref())
            .await?
            .map(into_entry)
            .transpose()
    }
}
