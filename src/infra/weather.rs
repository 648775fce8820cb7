//! Thin asynchronous client for the OpenWeatherMap current-weather endpoint.
//!
//! - Exactly one GET per call, metric units.
//! - No retry and no caching; any non-200 answer is a failure.

use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::WeatherReport;
use crate::util::settings::WeatherSettings;
use crate::util::version::USER_AGENT;

#[derive(Debug, Error)]
pub enum WeatherClientError {
    #[error("no weather API key configured")]
    MissingApiKey,
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(StatusCode),
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("api error: {0}")]
    Api(String),
}

#[derive(Clone)]
pub struct WeatherClient {
    http: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl WeatherClient {
    pub fn new(settings: &WeatherSettings) -> Result<Self, WeatherClientError> {
        Self::with_base_url(&settings.base_url, settings.api_key.clone())
    }

    pub fn with_base_url(base: &str, api_key: Option<String>) -> Result<Self, WeatherClientError> {
        // `Url::join` drops the last segment unless the base ends in a slash.
        let base_url = if base.ends_with('/') {
            Url::parse(base)?
        } else {
            Url::parse(&format!("{base}/"))?
        };
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    pub async fn fetch_weather(&self, location: &str) -> Result<WeatherReport, WeatherClientError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(WeatherClientError::MissingApiKey)?;

        let mut url = self.base_url.join("weather")?;
        url.query_pairs_mut()
            .append_pair("q", location)
            .append_pair("appid", api_key)
            .append_pair("units", "metric");

        tracing::debug!("requesting weather from {}", redact_key(&url));

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!("weather lookup for {location:?} failed with {status}");
            return Err(WeatherClientError::Status(status));
        }

        let body = response.bytes().await?;
        let dto: CurrentWeatherDto = serde_json::from_slice(&body)?;
        WeatherReport::try_from(dto)
    }
}

fn redact_key(url: &Url) -> Url {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == "appid" {
                "***".to_string()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherDto {
    main: MainDto,
    #[serde(default)]
    weather: Vec<ConditionDto>,
}

#[derive(Debug, Deserialize)]
struct MainDto {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionDto {
    description: String,
}

impl TryFrom<CurrentWeatherDto> for WeatherReport {
    type Error = WeatherClientError;

    fn try_from(dto: CurrentWeatherDto) -> Result<Self, Self::Error> {
        let description = dto
            .weather
            .into_iter()
            .next()
            .map(|condition| condition.description)
            .ok_or_else(|| WeatherClientError::Api("response missing weather conditions".into()))?;

        Ok(Self {
            temperature: dto.main.temp,
            description,
            humidity: dto.main.humidity,
        })
    }
}
