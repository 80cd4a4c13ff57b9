pub mod docs;
pub mod table;
pub mod workflows;

use std::borrow::Cow;

use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};

use crate::error::AppError;
use crate::state::{AppState, SharedState};

use table::{RouteId, RouteMatch};

/// Fallback handler: every request axum does not route itself goes through
/// the workflow route table.
pub async fn dispatch(
    State(state): State<SharedState>,
    method: Method,
    uri: Uri,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let path = uri.path();

    let Some(matched) = state.routes.find(&method, path) else {
        tracing::debug!("No route for {method} {path}");
        return AppError::RouteNotFound {
            method: method.to_string(),
            path: path.to_string(),
        }
        .into_response();
    };

    handle(&state, &matched, body)
        .await
        .unwrap_or_else(IntoResponse::into_response)
}

async fn handle(
    state: &AppState,
    matched: &RouteMatch<'_>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, AppError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(state.config.max_body_size)
        } else {
            AppError::BadRequest(rejection.body_text())
        }
    })?;

    // Params are matched raw; handlers see them percent-decoded.
    let param = match matched.param(0) {
        Some(raw) => urlencoding::decode(raw)
            .map_err(|_| AppError::BadRequest("Path parameter is not valid UTF-8".to_string()))?,
        None => Cow::Borrowed(""),
    };

    match matched.route.id {
        RouteId::CreateWorkflow => workflows::create(state, &body).await,
        RouteId::UpdateWorkflow => workflows::update(state, &param, &body).await,
        RouteId::ListWorkflows => workflows::list(state).await,
        RouteId::GetWorkflow => workflows::get(state, &param).await,
        RouteId::GetWorkflowByCustomId => workflows::get_by_custom_id(state, &param).await,
        RouteId::ApiDocs => Ok(docs::api_docs(&state.routes)),
    }
}
