use crate::common::constants::INTERVALS_ICU_BASE_URL;
use crate::common::error::{PlanError, Result};
use crate::common::types::{EventSink, SubmitReceipt};
use crate::config::IntervalsIcuConfig;
use crate::domain::WorkoutEvent;
use metrics::counter;
use tracing::{error, info, instrument};

/// intervals.icu API keys authenticate as this fixed basic-auth user
const API_KEY_USER: &str = "API_KEY";

/// Bulk event upload to an athlete's intervals.icu calendar
pub struct IntervalsIcuClient {
    client: reqwest::Client,
    base_url: String,
    athlete_id: String,
    api_key: String,
}

impl IntervalsIcuClient {
    pub fn new(athlete_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: INTERVALS_ICU_BASE_URL.to_string(),
            athlete_id: athlete_id.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &IntervalsIcuConfig) -> Self {
        let client = Self::new(config.athlete_id.clone(), config.api_key.clone());
        match &config.base_url {
            Some(base_url) => client.with_base_url(base_url.clone()),
            None => client,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn bulk_url(&self) -> String {
        format!(
            "{}/api/v1/athlete/{}/events/bulk",
            self.base_url.trim_end_matches('/'),
            self.athlete_id
        )
    }
}

#[async_trait::async_trait]
impl EventSink for IntervalsIcuClient {
    fn sink_name(&self) -> &str {
        "intervals_icu"
    }

    #[instrument(skip(self, events), fields(athlete_id = %self.athlete_id, events = events.len()))]
    async fn submit(&self, events: &[WorkoutEvent]) -> Result<SubmitReceipt> {
        let response = self
            .client
            .post(self.bulk_url())
            .basic_auth(API_KEY_USER, Some(&self.api_key))
            .json(events)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        if status != 200 {
            error!("intervals.icu upload failed with status {}", status);
            counter!("plan_upload_errors_total").increment(1);
            return Err(PlanError::Api { status, message: body });
        }

        info!("Uploaded {} events to intervals.icu", events.len());
        counter!("plan_events_uploaded_total").increment(events.len() as u64);
        Ok(SubmitReceipt {
            sink: self.sink_name().to_string(),
            submitted: events.len(),
            detail: body,
        })
    }
}
