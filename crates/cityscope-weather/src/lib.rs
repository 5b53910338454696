//! Weather service for Cityscope
//!
//! Provides current conditions for a named city via the OpenWeather
//! current-weather endpoint.

pub mod provider;
pub mod source;
pub mod types;

pub use provider::WeatherProvider;
pub use source::WeatherSource;
pub use types::*;
