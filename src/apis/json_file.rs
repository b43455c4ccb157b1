use crate::common::error::Result;
use crate::common::types::{EventSink, SubmitReceipt};
use crate::domain::WorkoutEvent;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Writes each batch to `<dir>/<prefix>_<timestamp>.json`, for dry runs and auditing
pub struct JsonFileSink {
    output_dir: PathBuf,
    prefix: String,
}

impl JsonFileSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            prefix: "plan_events".to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[async_trait::async_trait]
impl EventSink for JsonFileSink {
    fn sink_name(&self) -> &str {
        "json_file"
    }

    #[instrument(skip(self, events), fields(dir = %self.output_dir.display(), events = events.len()))]
    async fn submit(&self, events: &[WorkoutEvent]) -> Result<SubmitReceipt> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        let filepath = self.output_dir.join(format!("{}_{timestamp}.json", self.prefix));

        let json_content = serde_json::to_string_pretty(events)?;
        tokio::fs::write(&filepath, json_content).await?;

        let detail = filepath.to_string_lossy().to_string();
        info!("Saved {} events to {}", events.len(), detail);
        Ok(SubmitReceipt {
            sink: self.sink_name().to_string(),
            submitted: events.len(),
            detail,
        })
    }
}
