use serde::Deserialize;

use crate::model::PrefCode;

pub const DEFAULT_BASE_URL: &str = "https://opendata.resas-portal.go.jp";
pub const API_KEY_HEADER: &str = "X-API-KEY";

const PREFECTURES_PATH: &str = "/api/v1/prefectures";
const POPULATION_PATH: &str = "/api/v1/population/composition/perYear";

/// Connection settings for the open-data API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
        }
    }
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn prefectures_url(&self) -> String {
        format!("{}{}", self.base(), PREFECTURES_PATH)
    }

    // cityCode=- asks for the prefecture-wide total.
    pub fn population_url(&self, pref_code: PrefCode) -> String {
        format!(
            "{}{}?cityCode=-&prefCode={}",
            self.base(),
            POPULATION_PATH,
            pref_code
        )
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
