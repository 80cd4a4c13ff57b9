use axum::http::Method;

use workflow_tracker::routes::table::{Route, RouteId, RouteTable, Segment, workflow_routes};

#[test]
fn pattern_is_split_into_segments() {
    let route = Route::new(RouteId::GetWorkflowByCustomId, Method::GET, "/api/workflows/custom/:customId", "");
    assert_eq!(
        route.segments,
        vec![
            Segment::Literal(String::new()),
            Segment::Literal("api".to_string()),
            Segment::Literal("workflows".to_string()),
            Segment::Literal("custom".to_string()),
            Segment::Param("customId".to_string()),
        ]
    );
}

#[test]
fn every_route_matches_its_own_shape() {
    let table = workflow_routes();
    for route in table.routes() {
        let path = route.pattern.replace(":id", "abc").replace(":customId", "xyz");
        let matched = table
            .find(&route.method, &path)
            .unwrap_or_else(|| panic!("no match for {} {path}", route.method));
        assert_eq!(matched.route.id, route.id, "{} {path}", route.method);
    }
}

#[test]
fn params_are_captured_by_position() {
    let table = workflow_routes();

    let matched = table.find(&Method::PUT, "/api/workflows/wf-123").unwrap();
    assert_eq!(matched.route.id, RouteId::UpdateWorkflow);
    assert_eq!(matched.params, vec!["wf-123"]);
    assert_eq!(matched.param(0), Some("wf-123"));
    assert_eq!(matched.param(1), None);

    let matched = table.find(&Method::GET, "/api/workflows/custom/ticket-7").unwrap();
    assert_eq!(matched.route.id, RouteId::GetWorkflowByCustomId);
    assert_eq!(matched.param(0), Some("ticket-7"));
}

#[test]
fn method_selects_between_same_shapes() {
    let table = workflow_routes();

    assert_eq!(
        table.find(&Method::POST, "/api/workflows").unwrap().route.id,
        RouteId::CreateWorkflow
    );
    assert_eq!(
        table.find(&Method::GET, "/api/workflows").unwrap().route.id,
        RouteId::ListWorkflows
    );
    assert_eq!(
        table.find(&Method::GET, "/api/workflows/1").unwrap().route.id,
        RouteId::GetWorkflow
    );
    assert!(table.find(&Method::DELETE, "/api/workflows/1").is_none());
    assert!(table.find(&Method::POST, "/api/workflows/1").is_none());
}

#[test]
fn segment_count_must_match() {
    let table = workflow_routes();

    assert!(table.find(&Method::GET, "/api").is_none());
    assert!(table.find(&Method::GET, "/api/workflows/1/extra").is_none());
    assert!(table.find(&Method::PUT, "/api/workflows").is_none());
    // No trailing-slash normalization
    assert!(table.find(&Method::POST, "/api/workflows/").is_none());
    assert!(table.find(&Method::GET, "api/workflows").is_none());
}

#[test]
fn param_rejects_empty_segment_only() {
    let table = workflow_routes();

    assert!(table.find(&Method::PUT, "/api/workflows/").is_none());
    assert!(table.find(&Method::GET, "/api/workflows/custom/").is_none());

    for value in ["0", "-", "null", "undefined", "%20", "custom"] {
        let path = format!("/api/workflows/{value}");
        let matched = table.find(&Method::GET, &path).unwrap();
        assert_eq!(matched.route.id, RouteId::GetWorkflow);
        assert_eq!(matched.param(0), Some(value));
    }
}

#[test]
fn literals_match_verbatim() {
    let table = workflow_routes();

    assert!(table.find(&Method::GET, "/API/workflows").is_none());
    assert!(table.find(&Method::GET, "/api/Workflows").is_none());
    assert!(table.find(&Method::GET, "/api/workflow").is_none());
}

#[test]
fn first_registered_route_wins() {
    let table = RouteTable::new()
        .route(Route::new(RouteId::GetWorkflow, Method::GET, "/items/:id", "by id"))
        .route(Route::new(RouteId::ApiDocs, Method::GET, "/items/docs", "docs"));

    assert_eq!(
        table.find(&Method::GET, "/items/docs").unwrap().route.id,
        RouteId::GetWorkflow
    );
}

#[test]
fn empty_table_matches_nothing() {
    let table = RouteTable::new();
    assert!(table.find(&Method::GET, "/").is_none());
}
