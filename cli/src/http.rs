use anyhow::{Context, Result};
use prefpop_core::{
    API_KEY_HEADER, ApiConfig, FetchError, FetchFailure, Population, PrefCode, Prefecture,
    parse_population, parse_prefectures,
};
use reqwest::Client;
use tracing::debug;

pub struct ResasClient {
    client: Client,
    config: ApiConfig,
}

impl ResasClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("prefpop/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("HTTP クライアントの初期化に失敗しました")?;
        Ok(Self { client, config })
    }

    pub async fn fetch_prefectures(&self) -> Result<Vec<Prefecture>, FetchError> {
        let body = self
            .get(&self.config.prefectures_url())
            .await
            .map_err(FetchError::catalog)?;
        parse_prefectures(&body).map_err(FetchError::catalog)
    }

    pub async fn fetch_population(&self, pref_code: PrefCode) -> Result<Population, FetchError> {
        let body = self
            .get(&self.config.population_url(pref_code))
            .await
            .map_err(|failure| FetchError::series(pref_code, failure))?;
        parse_population(&body).map_err(|failure| FetchError::series(pref_code, failure))
    }

    async fn get(&self, url: &str) -> Result<String, FetchFailure> {
        debug!(url, "GET");
        let mut request = self.client.get(url);
        if self.config.has_api_key() {
            request = request.header(API_KEY_HEADER, self.config.api_key.as_str());
        }
        let response = request
            .send()
            .await
            .map_err(|err| FetchFailure::Transport(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Status(status.as_u16()));
        }
        response
            .text()
            .await
            .map_err(|err| FetchFailure::Transport(err.to_string()))
    }
}
