use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    JsonMap, NewWorkflow, WorkflowEntry, WorkflowKey, WorkflowStatus, WorkflowType,
    WorkflowUpdated,
};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateWorkflow {
    #[serde(rename = "type")]
    pub workflow_type: Option<String>,
    #[serde(rename = "inputData")]
    pub input_data: Option<JsonMap>,
    pub custom_id: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateWorkflow {
    pub status: Option<String>,
    pub outcome: Option<JsonMap>,
    pub custom_id: Option<String>,
    /// Resolve the target by `custom_id` from the body instead of the path id.
    #[serde(default, alias = "useCustomId")]
    pub use_custom_id: bool,
}

/// Bodies must be JSON objects; derived structs alone would also take arrays positionally.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?;
    if !value.is_object() {
        return Err(AppError::BadRequest(
            "Request body must be a JSON object".to_string(),
        ));
    }
    serde_json::from_value(value).map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))
}

fn not_found() -> AppError {
    AppError::NotFound("Workflow not found".to_string())
}

fn success(status: StatusCode, message: &str, data: impl serde::Serialize) -> Response {
    (
        status,
        Json(json!({ "success": true, "message": message, "data": data })),
    )
        .into_response()
}

async fn lookup(state: &AppState, key: &WorkflowKey) -> Result<Option<WorkflowEntry>, AppError> {
    let entry = match key {
        WorkflowKey::Id(id) => state.store.get_by_id(*id).await?,
        WorkflowKey::CustomId(custom_id) => state.store.get_by_custom_id(custom_id).await?,
    };
    Ok(entry)
}

pub async fn create(state: &AppState, body: &[u8]) -> Result<Response, AppError> {
    let req: CreateWorkflow = parse_body(body)?;

    let (Some(workflow_type), Some(input_data)) = (req.workflow_type, req.input_data) else {
        return Err(AppError::MissingFields("type, inputData"));
    };
    let workflow_type: WorkflowType = workflow_type.parse().map_err(AppError::BadRequest)?;

    if let Some(custom_id) = &req.custom_id {
        if custom_id.is_empty() {
            return Err(AppError::BadRequest("custom_id must not be empty".to_string()));
        }
        // The unique index on custom_id still decides if two creates race past this check.
        if state.store.get_by_custom_id(custom_id).await?.is_some() {
            tracing::debug!("Rejected duplicate custom_id {custom_id}");
            return Err(AppError::Conflict(format!(
                "A workflow with custom_id '{custom_id}' already exists"
            )));
        }
    }

    let entry = state
        .store
        .insert(NewWorkflow {
            custom_id: req.custom_id,
            workflow_type,
            input_data,
        })
        .await?;

    tracing::info!(id = %entry.id, workflow_type = %entry.workflow_type, "Workflow created");

    Ok(success(StatusCode::CREATED, "Workflow created", entry))
}

pub async fn update(state: &AppState, path_id: &str, body: &[u8]) -> Result<Response, AppError> {
    let req: UpdateWorkflow = parse_body(body)?;

    let status: WorkflowStatus = req
        .status
        .ok_or(AppError::MissingFields("status"))?
        .parse()
        .map_err(AppError::BadRequest)?;

    let key = if req.use_custom_id {
        match req.custom_id {
            Some(custom_id) if !custom_id.is_empty() => WorkflowKey::CustomId(custom_id),
            _ => return Err(AppError::MissingFields("custom_id")),
        }
    } else {
        WorkflowKey::Id(Uuid::parse_str(path_id).map_err(|_| not_found())?)
    };

    let Some(existing) = lookup(state, &key).await? else {
        tracing::debug!("Update for unknown workflow {key}");
        return Err(not_found());
    };

    let updated = state
        .store
        .update(&WorkflowKey::Id(existing.id), status, req.outcome)
        .await?
        .ok_or_else(not_found)?;

    tracing::info!(id = %updated.id, status = %updated.status, "Workflow updated");

    Ok(success(
        StatusCode::OK,
        "Workflow updated",
        WorkflowUpdated::from(updated),
    ))
}

pub async fn list(state: &AppState) -> Result<Response, AppError> {
    let entries = state.store.list().await?;
    Ok(success(StatusCode::OK, "Workflows retrieved", entries))
}

pub async fn get(state: &AppState, id: &str) -> Result<Response, AppError> {
    let id = Uuid::parse_str(id).map_err(|_| not_found())?;
    let entry = lookup(state, &WorkflowKey::Id(id)).await?.ok_or_else(not_found)?;
    Ok(success(StatusCode::OK, "Workflow retrieved", entry))
}

pub async fn get_by_custom_id(state: &AppState, custom_id: &str) -> Result<Response, AppError> {
    let entry = lookup(state, &WorkflowKey::CustomId(custom_id.to_string()))
        .await?
        .ok_or_else(not_found)?;
    Ok(success(StatusCode::OK, "Workflow retrieved", entry))
}
