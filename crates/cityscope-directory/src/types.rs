use serde::{Deserialize, Serialize};

/// A city as shown in the directory table.
///
/// There is no stable identifier upstream; for de-duplication a city is
/// identified by its lower-cased `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub country: String,
    pub timezone: String,
}

impl City {
    pub fn new(
        name: impl Into<String>,
        country: impl Into<String>,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            timezone: timezone.into(),
        }
    }

    /// De-duplication key.
    pub fn identity(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Search response from the open data portal (records API v1).
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub records: Vec<GeonameRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeonameRecord {
    pub fields: GeonameFields,
}

/// Only the columns the directory uses; the dataset carries many more.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct GeonameFields {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cou_name_en: String,
    #[serde(default)]
    pub timezone: String,
}

impl From<GeonameRecord> for City {
    fn from(record: GeonameRecord) -> Self {
        let GeonameFields {
            name,
            cou_name_en,
            timezone,
        } = record.fields;
        City {
            name,
            country: cou_name_en,
            timezone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_maps_to_city() {
        let json = serde_json::json!({
            "records": [
                {
                    "datasetid": "geonames-all-cities-with-a-population-1000",
                    "fields": {
                        "name": "Lyon",
                        "cou_name_en": "France",
                        "timezone": "Europe/Paris",
                        "population": 522969
                    }
                }
            ]
        });

        let resp: SearchResponse = serde_json::from_value(json).unwrap();
        let cities: Vec<City> = resp.records.into_iter().map(City::from).collect();

        assert_eq!(cities, vec![City::new("Lyon", "France", "Europe/Paris")]);
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let json = serde_json::json!({ "records": [ { "fields": { "name": "Nowhere" } } ] });
        let resp: SearchResponse = serde_json::from_value(json).unwrap();
        let city = City::from(resp.records.into_iter().next().unwrap());
        assert_eq!(city.country, "");
        assert_eq!(city.timezone, "");
    }

    #[test]
    fn test_identity_is_case_insensitive() {
        let a = City::new("Rome", "Italy", "Europe/Rome");
        let b = City::new("ROME", "United States", "America/New_York");
        assert_eq!(a.identity(), b.identity());
    }
}
