use async_trait::async_trait;

use crate::{WeatherError, WeatherSnapshot};

/// Resolves a city name into its current weather.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current(&self, city: &str) -> Result<WeatherSnapshot, WeatherError>;
}
