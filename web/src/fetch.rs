use gloo_net::http::Request;
use prefpop_core::{
    API_KEY_HEADER, ApiConfig, FetchError, FetchFailure, Population, PrefCode, Prefecture,
    parse_population, parse_prefectures,
};

pub async fn fetch_prefectures(config: &ApiConfig) -> Result<Vec<Prefecture>, FetchError> {
    let body = get(config, &config.prefectures_url())
        .await
        .map_err(FetchError::catalog)?;
    parse_prefectures(&body).map_err(FetchError::catalog)
}

pub async fn fetch_population(
    config: &ApiConfig,
    pref_code: PrefCode,
) -> Result<Population, FetchError> {
    let body = get(config, &config.population_url(pref_code))
        .await
        .map_err(|failure| FetchError::series(pref_code, failure))?;
    parse_population(&body).map_err(|failure| FetchError::series(pref_code, failure))
}

async fn get(config: &ApiConfig, url: &str) -> Result<String, FetchFailure> {
    let mut request = Request::get(url);
    if config.has_api_key() {
        request = request.header(API_KEY_HEADER, &config.api_key);
    }
    let response = request
        .send()
        .await
        .map_err(|err| FetchFailure::Transport(err.to_string()))?;
    if !response.ok() {
        return Err(FetchFailure::Status(response.status()));
    }
    response
        .text()
        .await
        .map_err(|err| FetchFailure::Transport(err.to_string()))
}
