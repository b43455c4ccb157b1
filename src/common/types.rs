use crate::common::error::Result;
use crate::domain::{TableRow, WorkoutEvent};
use serde::Serialize;

/// Core trait that every plan table source must implement
#[async_trait::async_trait]
pub trait RowSource: Send + Sync {
    /// Short identifier used in logs
    fn source_name(&self) -> &str;

    /// Fetch every row of the plan table, in sheet order
    async fn fetch_rows(&self) -> Result<Vec<TableRow>>;
}

/// Where finished events are delivered
#[async_trait::async_trait]
pub trait EventSink: Send + Sync {
    fn sink_name(&self) -> &str;

    /// Submit the whole batch at once. Failures carry the collaborator's diagnostic.
    async fn submit(&self, events: &[WorkoutEvent]) -> Result<SubmitReceipt>;
}

/// Outcome of a successful submission
#[derive(Debug, Clone, Serialize)]
pub struct SubmitReceipt {
    pub sink: String,
    pub submitted: usize,
    /// Response body or output path, for display
    pub detail: String,
}
