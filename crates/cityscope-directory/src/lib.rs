//! City directory for Cityscope
//!
//! Fetches pages of cities from the public geonames dataset and exposes them
//! through the [`CitySource`] seam consumed by the list engine.

pub mod client;
pub mod error;
pub mod source;
pub mod types;

pub use client::DirectoryClient;
pub use error::DirectoryError;
pub use source::CitySource;
pub use types::City;
