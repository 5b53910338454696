//! Weather backend: async current-conditions fetching.
//! All network work runs off the UI thread; results sent via mpsc.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use cityscope_weather::{WeatherSnapshot, WeatherSource};
use tokio::runtime::Handle;

/// Error type for weather operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherError {
    /// The lookup failed; the cause is only in the log.
    Unavailable(String),
    NotInitialized,
}

impl std::fmt::Display for WeatherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherError::Unavailable(city) => write!(f, "Weather unavailable for {}", city),
            WeatherError::NotInitialized => write!(f, "Weather service not initialized"),
        }
    }
}

impl std::error::Error for WeatherError {}

/// Messages sent from async operations back to the UI thread
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// Result of fetching weather for `city`
    FetchDone {
        city: String,
        result: Result<WeatherSnapshot, WeatherError>,
    },
}

/// Request current weather for `city` asynchronously.
/// Sends `FetchDone` on the channel when complete.
pub fn request_fetch(
    tx: &Sender<WeatherServiceMessage>,
    source: Arc<dyn WeatherSource>,
    runtime: &Handle,
    city: String,
) {
    let tx = tx.clone();
    runtime.spawn(async move {
        let result = source
            .current(&city)
            .await
            .map_err(|_| WeatherError::Unavailable(city.clone()));
        let _ = tx.send(WeatherServiceMessage::FetchDone { city, result });
    });
}
