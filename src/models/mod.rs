pub mod workflow;

pub use workflow::{
    JsonMap, NewWorkflow, WorkflowEntry, WorkflowKey, WorkflowRow, WorkflowStatus, WorkflowType,
    WorkflowUpdated,
};
