use std::sync::Arc;

use crate::config::Config;
use crate::db::WorkflowStore;
use crate::routes::table::RouteTable;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub store: Arc<dyn WorkflowStore>,
    pub routes: RouteTable,
    pub config: Config,
}
