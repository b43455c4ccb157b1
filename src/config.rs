use crate::common::constants::{
    ENV_INTERVALS_API_KEY, ENV_INTERVALS_ATHLETE_ID, ENV_SHEETS_ACCESS_TOKEN, ENV_SHEETS_API_KEY,
};
use crate::common::error::{PlanError, Result};
use crate::pipeline::rows::PlanLayout;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub google_sheets: Option<GoogleSheetsConfig>,
    pub intervals_icu: Option<IntervalsIcuConfig>,
    #[serde(default)]
    pub plan: PlanConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleSheetsConfig {
    pub sheet_id: String,
    /// First tab when unset
    pub sheet_name: Option<String>,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntervalsIcuConfig {
    pub athlete_id: String,
    #[serde(default)]
    pub api_key: String,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanConfig {
    #[serde(default)]
    pub layout: PlanLayout,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            layout: PlanLayout::default(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> String {
    "output".to_string()
}

impl Config {
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let config_path = config_path.as_ref();
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            PlanError::Config(format!("Failed to read config file '{}': {}", config_path.display(), e))
        })?;

        let mut config: Config = toml::from_str(&config_content)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields defaults plus environment overrides
    pub fn load_or_default(config_path: impl AsRef<Path>) -> Result<Self> {
        if config_path.as_ref().exists() {
            return Self::load(config_path);
        }
        let mut config = Config::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Secrets from the environment (and `.env`) win over the file
    pub fn apply_env_overrides(&mut self) {
        dotenv::dotenv().ok();
        self.apply_overrides(|name| std::env::var(name).ok().filter(|v| !v.trim().is_empty()));
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let api_key = lookup(ENV_INTERVALS_API_KEY);
        let athlete_id = lookup(ENV_INTERVALS_ATHLETE_ID);
        match &mut self.intervals_icu {
            Some(icu) => {
                if let Some(key) = api_key {
                    icu.api_key = key;
                }
                if let Some(id) = athlete_id {
                    icu.athlete_id = id;
                }
            }
            None => {
                if let (Some(api_key), Some(athlete_id)) = (api_key, athlete_id) {
                    self.intervals_icu = Some(IntervalsIcuConfig {
                        athlete_id,
                        api_key,
                        base_url: None,
                    });
                }
            }
        }

        if let Some(sheets) = &mut self.google_sheets {
            if let Some(key) = lookup(ENV_SHEETS_API_KEY) {
                sheets.api_key = Some(key);
            }
            if let Some(token) = lookup(ENV_SHEETS_ACCESS_TOKEN) {
                sheets.access_token = Some(token);
            }
        }
    }

    pub fn google_sheets(&self) -> Result<&GoogleSheetsConfig> {
        self.google_sheets
            .as_ref()
            .ok_or_else(|| PlanError::Config("no [google_sheets] section and no --csv given".to_string()))
    }

    pub fn intervals_icu(&self) -> Result<&IntervalsIcuConfig> {
        let icu = self
            .intervals_icu
            .as_ref()
            .ok_or_else(|| PlanError::Config("no [intervals_icu] section configured".to_string()))?;
        if icu.api_key.trim().is_empty() {
            return Err(PlanError::MissingField(format!(
                "intervals_icu.api_key (or {ENV_INTERVALS_API_KEY})"
            )));
        }
        Ok(icu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn parse(toml_text: &str) -> Config {
        toml::from_str(toml_text).unwrap()
    }

    #[test]
    fn test_full_config() {
        let config = parse(
            r#"
            [google_sheets]
            sheet_id = "abc"
            sheet_name = "Plan"

            [intervals_icu]
            athlete_id = "i42"
            api_key = "secret"

            [plan]
            layout = "compact"
            "#,
        );
        assert_eq!(config.google_sheets().unwrap().sheet_name.as_deref(), Some("Plan"));
        assert_eq!(config.intervals_icu().unwrap().athlete_id, "i42");
        assert_eq!(config.plan.layout, PlanLayout::Compact);
        assert_eq!(config.plan.output_dir, "output");
    }

    #[test]
    fn test_missing_sections() {
        let config = parse("");
        assert_eq!(config.plan.layout, PlanLayout::Labelled);
        assert!(matches!(config.google_sheets(), Err(PlanError::Config(_))));
        assert!(matches!(config.intervals_icu(), Err(PlanError::Config(_))));

        let config = parse("[intervals_icu]\nathlete_id = \"i42\"\n");
        assert!(matches!(config.intervals_icu(), Err(PlanError::MissingField(_))));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_INTERVALS_API_KEY, "from-env"),
            (ENV_INTERVALS_ATHLETE_ID, "i7"),
            (ENV_SHEETS_ACCESS_TOKEN, "token"),
        ]);
        let lookup = |name: &str| env.get(name).map(|v| v.to_string());

        let mut config = parse("[google_sheets]\nsheet_id = \"abc\"\n");
        config.apply_overrides(lookup);
        let icu = config.intervals_icu().unwrap();
        assert_eq!((icu.athlete_id.as_str(), icu.api_key.as_str()), ("i7", "from-env"));
        assert_eq!(config.google_sheets().unwrap().access_token.as_deref(), Some("token"));
        assert_eq!(config.google_sheets().unwrap().api_key, None);
    }

    #[test]
    fn test_load_reports_bad_path_and_bad_toml() {
        assert!(matches!(Config::load("/no/such/config.toml"), Err(PlanError::Config(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[plan]\nlayout = \"sideways\"").unwrap();
        assert!(matches!(Config::load(file.path()), Err(PlanError::Toml(_))));
    }
}
