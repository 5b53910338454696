//! Cityscope front end: view models, async service plumbing, routing and the
//! terminal shell.

pub mod bridge;
pub mod error_mapping;
pub mod models;
pub mod router;
pub mod services;
pub mod shell;

pub use models::{CityTableModel, WeatherModel, WeatherViewState};
pub use router::Route;
pub use shell::Shell;
