//! Path routing between the city list and the weather view.

use std::fmt;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

const WEATHER_PREFIX: &str = "/weather/";

/// Characters left as-is in a path segment, matching `encodeURIComponent`.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    CityList,
    Weather { city: String },
    NotFound(String),
}

impl Route {
    pub fn parse(path: &str) -> Route {
        let trimmed = path.trim();
        if trimmed.is_empty() || trimmed == "/" {
            return Route::CityList;
        }

        if let Some(segment) = trimmed.strip_prefix(WEATHER_PREFIX) {
            let segment = segment.strip_suffix('/').unwrap_or(segment);
            if !segment.is_empty() && !segment.contains('/') {
                if let Ok(city) = percent_decode_str(segment).decode_utf8() {
                    return Route::Weather {
                        city: city.into_owned(),
                    };
                }
            }
        }

        Route::NotFound(trimmed.to_string())
    }

    pub fn weather(city: &str) -> Route {
        Route::Weather {
            city: city.to_string(),
        }
    }

    /// Canonical path for this route
    pub fn path(&self) -> String {
        match self {
            Route::CityList => "/".to_string(),
            Route::Weather { city } => {
                format!("{}{}", WEATHER_PREFIX, utf8_percent_encode(city, SEGMENT))
            }
            Route::NotFound(path) => path.clone(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
