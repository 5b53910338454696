pub mod city_table_model;
pub mod weather_model;

#[cfg(test)]
pub(crate) mod test_support;

pub use city_table_model::CityTableModel;
pub use weather_model::{WeatherModel, WeatherViewState};
