use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;

use super::table::RouteTable;

#[derive(Serialize)]
pub struct RouteDoc<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub description: &'a str,
}

pub fn describe(routes: &RouteTable) -> Vec<RouteDoc<'_>> {
    routes
        .routes()
        .iter()
        .map(|r| RouteDoc {
            method: r.method.as_str(),
            path: &r.pattern,
            description: &r.description,
        })
        .collect()
}

pub fn api_docs(routes: &RouteTable) -> Response {
    Json(json!({
        "success": true,
        "message": "Available API routes",
        "data": describe(routes),
    }))
    .into_response()
}
