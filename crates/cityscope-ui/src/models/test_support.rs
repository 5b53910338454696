//! In-memory sources for model tests.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use cityscope_directory::{City, CitySource, DirectoryError};
use cityscope_weather::{Condition, WeatherError, WeatherSnapshot, WeatherSource};
use parking_lot::Mutex;

/// Call `busy` until it returns false, failing the test after a few seconds.
pub fn settle(mut busy: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while busy() {
        assert!(Instant::now() < deadline, "model never settled");
        std::thread::sleep(Duration::from_millis(5));
    }
}

/// Serves `pages[page - 1]`, empty past the end.
#[derive(Default)]
pub struct FakeDirectory {
    pages: Vec<Vec<City>>,
    requests: Mutex<Vec<u32>>,
}

impl FakeDirectory {
    pub fn with_pages(pages: Vec<Vec<City>>) -> Arc<Self> {
        Arc::new(Self {
            pages,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<u32> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl CitySource for FakeDirectory {
    async fn fetch_page(&self, page: u32) -> Result<Vec<City>, DirectoryError> {
        self.requests.lock().push(page);
        let index = page.saturating_sub(1) as usize;
        Ok(self.pages.get(index).cloned().unwrap_or_default())
    }
}

/// Knows only Oslo.
#[derive(Default)]
pub struct FakeWeather;

impl FakeWeather {
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }
}

#[async_trait]
impl WeatherSource for FakeWeather {
    async fn current(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        if city != "Oslo" {
            return Err(WeatherError::CityUnavailable);
        }
        Ok(WeatherSnapshot {
            temperature: 4.5,
            condition: Condition {
                description: "light snow".to_string(),
                category: "Snow".to_string(),
            },
            humidity: 86.0,
            wind_speed: 3.6,
            pressure: 1008.0,
            fetched_at: Utc::now(),
        })
    }
}
