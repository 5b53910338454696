use chrono::{DateTime, Utc};
use cityscope_core::error::CITY_UNAVAILABLE_MESSAGE;
use serde::{Deserialize, Serialize};

/// The API reports success in the body as `"cod": 200`.
pub const SUCCESS_CODE: i64 = 200;

/// Display categories for the upstream `weather[0].main` value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCategory {
    Clear,
    Rain,
    Clouds,
    Snow,
    #[default]
    Other,
}

impl WeatherCategory {
    /// Map the upstream group name (e.g. "Clouds") to a category
    pub fn from_main(main: &str) -> Self {
        match main {
            "Clear" => Self::Clear,
            "Rain" => Self::Rain,
            "Clouds" => Self::Clouds,
            "Snow" => Self::Snow,
            _ => Self::Other,
        }
    }

    /// Get icon name for the weather view
    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Clear => "sunny",
            Self::Rain => "rainy",
            Self::Clouds => "cloudy",
            Self::Snow => "snowy",
            Self::Other => "default",
        }
    }

    /// Small terminal glyph for the icon
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Clear => "☀",
            Self::Rain => "☔",
            Self::Clouds => "☁",
            Self::Snow => "❄",
            Self::Other => "◌",
        }
    }
}

/// Condition text as reported upstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Free text, e.g. "light rain"
    pub description: String,
    /// Group name, e.g. "Rain"
    pub category: String,
}

impl Condition {
    pub fn kind(&self) -> WeatherCategory {
        WeatherCategory::from_main(&self.category)
    }
}

/// Current conditions for one city. Fetched per navigation, never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// °C
    pub temperature: f64,
    pub condition: Condition,
    /// %
    pub humidity: f64,
    /// m/s
    pub wind_speed: f64,
    /// hPa
    pub pressure: f64,
    pub fetched_at: DateTime<Utc>,
}

/// Raw body of the current-weather endpoint. Only the consumed fields are typed.
#[derive(Debug, Deserialize)]
pub(crate) struct CurrentWeatherResponse {
    /// Number on success, frequently a string on failure ("404")
    #[serde(default)]
    pub cod: serde_json::Value,
    pub main: Option<MainBlock>,
    #[serde(default)]
    pub weather: Vec<ConditionBlock>,
    pub wind: Option<WindBlock>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MainBlock {
    pub temp: f64,
    pub pressure: f64,
    pub humidity: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConditionBlock {
    pub main: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WindBlock {
    pub speed: f64,
}

impl CurrentWeatherResponse {
    pub fn is_success(&self) -> bool {
        self.cod.as_i64() == Some(SUCCESS_CODE)
    }

    /// Convert to a snapshot. `Err` carries a diagnostic for the log only.
    pub fn into_snapshot(self, fetched_at: DateTime<Utc>) -> Result<WeatherSnapshot, String> {
        if !self.is_success() {
            return Err(format!(
                "cod {} ({})",
                self.cod,
                self.message.as_deref().unwrap_or("no message")
            ));
        }

        let main = self.main.ok_or("missing main block")?;
        let wind = self.wind.ok_or("missing wind block")?;
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or("empty weather list")?;

        Ok(WeatherSnapshot {
            temperature: main.temp,
            condition: Condition {
                description: condition.description,
                category: condition.main,
            },
            humidity: main.humidity,
            wind_speed: wind.speed,
            pressure: main.pressure,
            fetched_at,
        })
    }
}

/// Weather provider errors.
///
/// Deliberately a single variant: callers only ever show the fixed message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WeatherError {
    #[error("{}", CITY_UNAVAILABLE_MESSAGE)]
    CityUnavailable,
}
