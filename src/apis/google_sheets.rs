use crate::common::constants::SHEETS_API_BASE_URL;
use crate::common::error::{PlanError, Result};
use crate::common::types::RowSource;
use crate::config::GoogleSheetsConfig;
use crate::domain::TableRow;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetsAuth {
    /// `key=` query parameter, enough for link-shared sheets
    ApiKey(String),
    /// OAuth bearer token for private sheets
    AccessToken(String),
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Debug, Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

/// Plan rows straight from the Sheets v4 values API
pub struct GoogleSheetsSource {
    client: reqwest::Client,
    base_url: String,
    sheet_id: String,
    sheet_name: Option<String>,
    auth: SheetsAuth,
}

impl GoogleSheetsSource {
    pub fn new(sheet_id: impl Into<String>, sheet_name: Option<String>, auth: SheetsAuth) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: SHEETS_API_BASE_URL.to_string(),
            sheet_id: sheet_id.into(),
            sheet_name,
            auth,
        }
    }

    pub fn from_config(config: &GoogleSheetsConfig) -> Result<Self> {
        let auth = match (&config.access_token, &config.api_key) {
            (Some(token), _) => SheetsAuth::AccessToken(token.clone()),
            (None, Some(key)) => SheetsAuth::ApiKey(key.clone()),
            (None, None) => {
                return Err(PlanError::Config(
                    "google_sheets needs an api_key or an access_token".to_string(),
                ))
            }
        };
        Ok(Self::new(config.sheet_id.clone(), config.sheet_name.clone(), auth))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// `{base}/{id}` or `{base}/{id}/values/{range}`, each piece path-encoded
    pub fn endpoint(&self, range: Option<&str>) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| PlanError::Config(format!("Invalid Sheets base URL {}: {}", self.base_url, e)))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| PlanError::Config(format!("Sheets base URL cannot take a path: {}", self.base_url)))?;
            segments.pop_if_empty().push(&self.sheet_id);
            if let Some(range) = range {
                segments.push("values").push(range);
            }
        }
        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            SheetsAuth::ApiKey(key) => request.query(&[("key", key)]),
            SheetsAuth::AccessToken(token) => request.bearer_auth(token),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!("Sheets API returned status {}", status.as_u16());
            return Err(PlanError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Title of the configured tab, or of the first tab when none is configured
    async fn sheet_title(&self) -> Result<String> {
        if let Some(name) = &self.sheet_name {
            return Ok(name.clone());
        }

        debug!("No sheet name configured, looking up the first tab");
        let request = self
            .client
            .get(self.endpoint(None)?)
            .query(&[("fields", "sheets.properties.title")]);
        let meta: SpreadsheetMeta = self.get_json(request).await?;
        meta.sheets
            .into_iter()
            .next()
            .map(|sheet| sheet.properties.title)
            .ok_or_else(|| PlanError::MissingField("spreadsheet has no tabs".to_string()))
    }
}

/// Quote a tab name for use as an A1 range
pub fn sheet_range(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

fn rows_from_values(range: ValueRange) -> Vec<TableRow> {
    range.values.into_iter().map(TableRow::new).collect()
}

#[async_trait::async_trait]
impl RowSource for GoogleSheetsSource {
    fn source_name(&self) -> &str {
        "google_sheets"
    }

    #[instrument(skip(self), fields(sheet_id = %self.sheet_id))]
    async fn fetch_rows(&self) -> Result<Vec<TableRow>> {
        let title = self.sheet_title().await?;
        let url = self.endpoint(Some(&sheet_range(&title)))?;
        debug!("Fetching values for tab {}", title);

        let values: ValueRange = self.get_json(self.client.get(url)).await?;
        let rows = rows_from_values(values);
        info!("Fetched {} rows from tab {}", rows.len(), title);
        Ok(rows)
    }
}
