use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

/// Free-form, order-preserving payload used for `inputData` and `outcome`.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowType {
    CustomerService,
    Hr,
    FinancialAnalyst,
}

impl WorkflowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowType::CustomerService => "customer_service",
            WorkflowType::Hr => "hr",
            WorkflowType::FinancialAnalyst => "financial_analyst",
        }
    }
}

impl fmt::Display for WorkflowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer_service" => Ok(WorkflowType::CustomerService),
            "hr" => Ok(WorkflowType::Hr),
            "financial_analyst" => Ok(WorkflowType::FinancialAnalyst),
            other => Err(format!(
                "Invalid workflow type '{other}', expected customer_service, hr or financial_analyst"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    Pending,
    Completed,
    Failed,
}

impl WorkflowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::Pending => "pending",
            WorkflowStatus::Completed => "completed",
            WorkflowStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(WorkflowStatus::Pending),
            "completed" => Ok(WorkflowStatus::Completed),
            "failed" => Ok(WorkflowStatus::Failed),
            other => Err(format!(
                "Invalid status '{other}', expected pending, completed or failed"
            )),
        }
    }
}

/// A workflow entry in its external (API) shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowEntry {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub workflow_type: WorkflowType,
    #[serde(rename = "inputData")]
    pub input_data: JsonMap,
    pub status: WorkflowStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<JsonMap>,
    /// Last mutation time. Reported by the update webhook as `updated`.
    #[serde(skip)]
    pub updated_at: DateTime<Utc>,
}

/// Row of the `workflows` table, column names as stored.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WorkflowRow {
    pub id: Uuid,
    pub custom_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(rename = "type")]
    pub workflow_type: String,
    pub input_data: Json<JsonMap>,
    pub status: String,
    pub outcome: Option<Json<JsonMap>>,
}

impl TryFrom<WorkflowRow> for WorkflowEntry {
    type Error = String;

    fn try_from(row: WorkflowRow) -> Result<Self, Self::Error> {
        Ok(WorkflowEntry {
            id: row.id,
            custom_id: row.custom_id,
            timestamp: row.created_at,
            workflow_type: row.workflow_type.parse()?,
            input_data: row.input_data.0,
            status: row.status.parse()?,
            outcome: row.outcome.map(|o| o.0),
            updated_at: row.updated_at,
        })
    }
}

/// Fields supplied by the caller when creating an entry.
#[derive(Debug, Clone)]
pub struct NewWorkflow {
    pub custom_id: Option<String>,
    pub workflow_type: WorkflowType,
    pub input_data: JsonMap,
}

/// How an update locates its target entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowKey {
    Id(Uuid),
    CustomId(String),
}

impl fmt::Display for WorkflowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowKey::Id(id) => write!(f, "id {id}"),
            WorkflowKey::CustomId(custom_id) => write!(f, "custom_id {custom_id}"),
        }
    }
}

/// Key fields returned by the update webhook.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowUpdated {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    pub status: WorkflowStatus,
    pub outcome: Option<JsonMap>,
    pub updated: DateTime<Utc>,
}

impl From<WorkflowEntry> for WorkflowUpdated {
    fn from(entry: WorkflowEntry) -> Self {
        WorkflowUpdated {
            id: entry.id,
            custom_id: entry.custom_id,
            status: entry.status,
            outcome: entry.outcome,
            updated: entry.updated_at,
        }
    }
}
