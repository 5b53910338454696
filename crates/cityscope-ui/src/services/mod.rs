pub mod directory_service;
pub mod weather_service;

pub use directory_service::{
    request_page as request_directory_page,
    request_suggestions as request_directory_suggestions, DirectoryServiceMessage,
};
pub use weather_service::{
    request_fetch as request_weather_fetch, WeatherError, WeatherServiceMessage,
};
