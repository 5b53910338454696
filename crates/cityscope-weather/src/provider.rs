use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use cityscope_core::WeatherConfig;
use reqwest::Client;
use tracing::instrument;

use crate::source::WeatherSource;
use crate::types::{CurrentWeatherResponse, WeatherError, WeatherSnapshot};

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
    units: String,
}

impl WeatherProvider {
    pub fn new(config: &WeatherConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            units: config.units.clone(),
        })
    }

    /// Fetch current conditions for `city`.
    ///
    /// Every failure (transport, non-2xx, unparsable body, non-success `cod`)
    /// is logged and reported as [`WeatherError::CityUnavailable`].
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        match self.try_fetch(city).await {
            Ok(snapshot) => {
                tracing::info!("Weather for {}: {:.1}°C", city, snapshot.temperature);
                Ok(snapshot)
            }
            Err(detail) => {
                tracing::warn!("Weather lookup for {} failed: {}", city, detail);
                Err(WeatherError::CityUnavailable)
            }
        }
    }

    async fn try_fetch(&self, city: &str) -> Result<WeatherSnapshot, String> {
        let url = format!("{}{}", self.base_url, CURRENT_WEATHER_PATH);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
            ])
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(format!("status {}: {}", status, text));
        }

        let body: CurrentWeatherResponse = response
            .json()
            .await
            .map_err(|e| format!("parse error: {}", e))?;

        body.into_snapshot(Utc::now())
    }
}

#[async_trait]
impl WeatherSource for WeatherProvider {
    async fn current(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        self.fetch(city).await
    }
}
