use axum::http::Method;

/// Handlers reachable through the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteId {
    CreateWorkflow,
    UpdateWorkflow,
    ListWorkflows,
    GetWorkflow,
    GetWorkflowByCustomId,
    ApiDocs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    /// `:name` in a pattern; matches exactly one non-empty path segment.
    Param(String),
}

#[derive(Debug, Clone)]
pub struct Route {
    pub id: RouteId,
    pub method: Method,
    pub pattern: String,
    pub segments: Vec<Segment>,
    pub description: String,
}

impl Route {
    pub fn new(id: RouteId, method: Method, pattern: &str, description: &str) -> Self {
        let segments = pattern
            .split('/')
            .map(|s| match s.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(s.to_string()),
            })
            .collect();

        Self {
            id,
            method,
            pattern: pattern.to_string(),
            segments,
            description: description.to_string(),
        }
    }

    /// Captured parameter values in pattern order, or `None` if `path` does
    /// not have this route's shape. Methods are not considered here.
    pub fn match_path<'p>(&self, path: &'p str) -> Option<Vec<&'p str>> {
        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = Vec::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(lit) if lit == part => {}
                Segment::Param(_) if !part.is_empty() => params.push(part),
                _ => return None,
            }
        }
        Some(params)
    }
}

#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: Vec<&'a str>,
}

impl<'a> RouteMatch<'a> {
    pub fn param(&self, index: usize) -> Option<&'a str> {
        self.params.get(index).copied()
    }
}

/// Ordered route list; lookup is a linear first-match scan.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn find<'a>(&'a self, method: &Method, path: &'a str) -> Option<RouteMatch<'a>> {
        self.routes
            .iter()
            .filter(|r| r.method == *method)
            .find_map(|route| {
                route
                    .match_path(path)
                    .map(|params| RouteMatch { route, params })
            })
    }
}

pub fn workflow_routes() -> RouteTable {
    RouteTable::new()
        .route(Route::new(
            RouteId::CreateWorkflow,
            Method::POST,
            "/api/workflows",
            "Create a new workflow entry",
        ))
        .route(Route::new(
            RouteId::UpdateWorkflow,
            Method::PUT,
            "/api/workflows/:id",
            "Update the status and outcome of an existing workflow",
        ))
        .route(Route::new(
            RouteId::ListWorkflows,
            Method::GET,
            "/api/workflows",
            "List all workflow entries, newest first",
        ))
        .route(Route::new(
            RouteId::GetWorkflow,
            Method::GET,
            "/api/workflows/:id",
            "Fetch a workflow entry by id",
        ))
        .route(Route::new(
            RouteId::GetWorkflowByCustomId,
            Method::GET,
            "/api/workflows/custom/:customId",
            "Fetch a workflow entry by custom_id",
        ))
        .route(Route::new(
            RouteId::ApiDocs,
            Method::GET,
            "/api/docs",
            "Describe the available API routes",
        ))
}
