//! Derived view: filter, then sort, then de-duplicate.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use cityscope_directory::City;

use crate::sort::SortSpec;

/// Table filter inputs. An empty `country` or `timezone` means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search_term: String,
    pub country: String,
    pub timezone: String,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.search_term.is_empty() && self.country.is_empty() && self.timezone.is_empty()
    }

    /// Case-insensitive substring on name, exact match on the constraints.
    pub fn matches(&self, city: &City) -> bool {
        self.matches_with_needle(city, &self.search_term.to_lowercase())
    }

    fn matches_with_needle(&self, city: &City, needle: &str) -> bool {
        city.name.to_lowercase().contains(needle)
            && (self.country.is_empty() || city.country == self.country)
            && (self.timezone.is_empty() || city.timezone == self.timezone)
    }
}

/// Compute the table rows for `cities` under `criteria` and `sort`.
///
/// De-duplication runs after sorting, so among cities sharing a lower-cased
/// name the one ranked last by the sort wins. It keeps the slot of the first
/// occurrence.
pub fn recompute_view(
    cities: &[City],
    criteria: &FilterCriteria,
    sort: Option<SortSpec>,
) -> Vec<City> {
    let needle = criteria.search_term.to_lowercase();
    let mut rows: Vec<&City> = cities
        .iter()
        .filter(|c| criteria.matches_with_needle(c, &needle))
        .collect();

    if let Some(spec) = sort {
        spec.apply(&mut rows);
    }

    dedup_by_name(rows.into_iter().cloned())
}

/// Collapse cities with the same lower-cased name.
///
/// Later entries overwrite earlier ones in place, like inserting into an
/// insertion-ordered map keyed by name.
pub fn dedup_by_name(cities: impl IntoIterator<Item = City>) -> Vec<City> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<City> = Vec::new();

    for city in cities {
        match slots.entry(city.identity()) {
            Entry::Occupied(slot) => out[*slot.get()] = city,
            Entry::Vacant(slot) => {
                slot.insert(out.len());
                out.push(city);
            }
        }
    }

    out
}

/// Distinct constraint values present in the accumulated collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub countries: Vec<String>,
    pub timezones: Vec<String>,
}

/// Facet values in first-seen order. Empty strings are skipped since an
/// empty constraint already means "any".
pub fn facets(cities: &[City]) -> Facets {
    let mut seen_countries = HashSet::new();
    let mut seen_timezones = HashSet::new();
    let mut out = Facets::default();

    for city in cities {
        if !city.country.is_empty() && seen_countries.insert(city.country.as_str()) {
            out.countries.push(city.country.clone());
        }
        if !city.timezone.is_empty() && seen_timezones.insert(city.timezone.as_str()) {
            out.timezones.push(city.timezone.clone());
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortKey;

    fn city(name: &str, country: &str, timezone: &str) -> City {
        City::new(name, country, timezone)
    }

    fn names(rows: &[City]) -> Vec<&str> {
        rows.iter().map(|c| c.name.as_str()).collect()
    }

    fn sample() -> Vec<City> {
        vec![
            city("London", "United Kingdom", "Europe/London"),
            city("Londonderry", "United Kingdom", "Europe/London"),
            city("London", "Canada", "America/Toronto"),
            city("Paris", "France", "Europe/Paris"),
            city("New London", "United States", "America/New_York"),
        ]
    }

    #[test]
    fn test_empty_input_gives_empty_view() {
        assert!(recompute_view(&[], &FilterCriteria::default(), None).is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let criteria = FilterCriteria {
            search_term: "LONDON".into(),
            ..Default::default()
        };
        let rows = recompute_view(&sample(), &criteria, None);
        assert_eq!(names(&rows), vec!["London", "Londonderry", "New London"]);
    }

    #[test]
    fn test_search_term_is_not_trimmed() {
        let criteria = FilterCriteria {
            search_term: " london".into(),
            ..Default::default()
        };
        let rows = recompute_view(&sample(), &criteria, None);
        assert_eq!(names(&rows), vec!["New London"]);
    }

    #[test]
    fn test_country_and_timezone_constraints() {
        let criteria = FilterCriteria {
            country: "United Kingdom".into(),
            timezone: "Europe/London".into(),
            ..Default::default()
        };
        let rows = recompute_view(&sample(), &criteria, None);
        assert_eq!(names(&rows), vec!["London", "Londonderry"]);

        let none = FilterCriteria {
            country: "united kingdom".into(),
            ..Default::default()
        };
        assert!(recompute_view(&sample(), &none, None).is_empty());
    }

    #[test]
    fn test_dedup_without_sort_keeps_first_slot_last_value() {
        let rows = recompute_view(&sample(), &FilterCriteria::default(), None);
        assert_eq!(
            names(&rows),
            vec!["London", "Londonderry", "Paris", "New London"]
        );
        // The Canadian London came later, so it wins the first London's slot
        assert_eq!(rows[0].country, "Canada");
    }

    #[test]
    fn test_dedup_after_sort_keeps_later_sorted_entry() {
        let cities = vec![
            city("Springfield", "A-land", "UTC"),
            city("Springfield", "C-land", "UTC"),
            city("Springfield", "B-land", "UTC"),
        ];

        let asc = recompute_view(
            &cities,
            &FilterCriteria::default(),
            Some(SortSpec::ascending(SortKey::Country)),
        );
        assert_eq!(asc.len(), 1);
        assert_eq!(asc[0].country, "C-land");

        let desc = recompute_view(
            &cities,
            &FilterCriteria::default(),
            Some(SortSpec::descending(SortKey::Country)),
        );
        assert_eq!(desc.len(), 1);
        assert_eq!(desc[0].country, "A-land");
    }

    #[test]
    fn test_rome_collapses_to_later_casing() {
        let cities = vec![
            city("Rome", "Italy", "Europe/Rome"),
            city("rome", "Italy", "Europe/Rome"),
        ];
        let rows = recompute_view(&cities, &FilterCriteria::default(), None);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "rome");
    }

    #[test]
    fn test_sorted_view() {
        let rows = recompute_view(
            &sample(),
            &FilterCriteria::default(),
            Some(SortSpec::descending(SortKey::Name)),
        );
        assert_eq!(
            names(&rows),
            vec!["Paris", "New London", "Londonderry", "London"]
        );
    }

    #[test]
    fn test_facets_cover_whole_collection_in_first_seen_order() {
        let f = facets(&sample());
        assert_eq!(
            f.countries,
            vec!["United Kingdom", "Canada", "France", "United States"]
        );
        assert_eq!(
            f.timezones,
            vec![
                "Europe/London",
                "America/Toronto",
                "Europe/Paris",
                "America/New_York"
            ]
        );
    }

    #[test]
    fn test_facets_skip_empty_values() {
        let f = facets(&[city("Ghost", "", "")]);
        assert!(f.countries.is_empty());
        assert!(f.timezones.is_empty());
    }
}
