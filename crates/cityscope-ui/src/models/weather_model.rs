use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use cityscope_core::AppError;
use cityscope_weather::{WeatherCategory, WeatherSnapshot, WeatherSource};
use tokio::runtime::Handle;

use crate::bridge;
use crate::services::{request_weather_fetch, WeatherError, WeatherServiceMessage};

#[derive(Debug, Clone, PartialEq)]
pub enum WeatherViewState {
    /// No city requested yet
    Idle,
    Loading,
    Data(WeatherSnapshot),
    /// User-facing message
    Error(String),
}

/// View model behind the weather view for a single city at a time.
pub struct WeatherModel {
    city: Option<String>,
    state: WeatherViewState,
    source: Option<Arc<dyn WeatherSource>>,
    runtime: Option<Handle>,
    tx: Sender<WeatherServiceMessage>,
    rx: Receiver<WeatherServiceMessage>,
}

impl Default for WeatherModel {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherModel {
    /// Model backed by the services published in [`bridge`].
    pub fn new() -> Self {
        match bridge::get_weather_service() {
            Some((source, runtime)) => Self::with_services(source, runtime),
            None => Self::build(None, None),
        }
    }

    pub fn with_services(source: Arc<dyn WeatherSource>, runtime: Handle) -> Self {
        Self::build(Some(source), Some(runtime))
    }

    fn build(source: Option<Arc<dyn WeatherSource>>, runtime: Option<Handle>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            city: None,
            state: WeatherViewState::Idle,
            source,
            runtime,
            tx,
            rx,
        }
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn state(&self) -> &WeatherViewState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state == WeatherViewState::Loading
    }

    /// Icon name for the current conditions, if loaded
    pub fn icon_name(&self) -> Option<&'static str> {
        match &self.state {
            WeatherViewState::Data(snapshot) => Some(snapshot.condition.kind().icon_name()),
            _ => None,
        }
    }

    pub fn category(&self) -> Option<WeatherCategory> {
        match &self.state {
            WeatherViewState::Data(snapshot) => Some(snapshot.condition.kind()),
            _ => None,
        }
    }

    /// Show `city`: resets to loading and starts a fresh fetch.
    pub fn navigate(&mut self, city: &str) {
        self.city = Some(city.to_string());
        self.state = WeatherViewState::Loading;

        match self.source.clone().zip(self.runtime.clone()) {
            Some((source, runtime)) => {
                tracing::info!("Fetching weather for {}", city);
                request_weather_fetch(&self.tx, source, &runtime, city.to_string());
            }
            None => {
                tracing::error!("Weather service not initialized");
                self.fail(WeatherError::NotInitialized);
            }
        }
    }

    /// Apply finished fetches. Returns true if the visible state changed.
    pub fn poll_channel(&mut self) -> bool {
        let mut changed = false;
        while let Ok(WeatherServiceMessage::FetchDone { city, result }) = self.rx.try_recv() {
            if self.city.as_deref() != Some(city.as_str()) {
                tracing::debug!("Discarding weather for {} (now showing {:?})", city, self.city);
                continue;
            }
            match result {
                Ok(snapshot) => self.state = WeatherViewState::Data(snapshot),
                Err(e) => self.fail(e),
            }
            changed = true;
        }
        changed
    }

    fn fail(&mut self, error: WeatherError) {
        let message = AppError::from(error).user_message();
        self.state = WeatherViewState::Error(message.to_string());
    }
}
