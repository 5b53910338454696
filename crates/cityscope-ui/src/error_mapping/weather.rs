use crate::services::weather_service::WeatherError as UiWeatherError;
use cityscope_core::{AppError, WeatherError};

impl From<UiWeatherError> for AppError {
    fn from(e: UiWeatherError) -> Self {
        match e {
            UiWeatherError::Unavailable(city) => {
                AppError::Weather(WeatherError::CityUnavailable(city))
            }
            UiWeatherError::NotInitialized => AppError::Weather(WeatherError::ServiceUnavailable),
        }
    }
}
