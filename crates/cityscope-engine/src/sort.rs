//! Column sorting and the header click toggle.

use std::fmt;
use std::str::FromStr;

use cityscope_directory::City;

/// Sortable table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Name,
    Country,
    Timezone,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Name, SortKey::Country, SortKey::Timezone];

    /// Column value used for ordering (lower-cased).
    pub fn sort_value(self, city: &City) -> String {
        self.field(city).to_lowercase()
    }

    pub fn field(self, city: &City) -> &str {
        match self {
            SortKey::Name => &city.name,
            SortKey::Country => &city.country,
            SortKey::Timezone => &city.timezone,
        }
    }

    /// Column header text
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Name => "City Name",
            SortKey::Country => "Country",
            SortKey::Timezone => "Timezone",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortKey::Name => "name",
            SortKey::Country => "country",
            SortKey::Timezone => "timezone",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort column '{0}' (expected name, country or timezone)")]
pub struct ParseSortKeyError(pub String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" | "city" => Ok(SortKey::Name),
            "country" => Ok(SortKey::Country),
            "timezone" | "tz" => Ok(SortKey::Timezone),
            other => Err(ParseSortKeyError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Descending,
        }
    }

    /// Result of clicking the `key` header while `current` is active.
    ///
    /// Only "same key, ascending" flips to descending; everything else,
    /// including no sort at all, lands on ascending. There is no way back
    /// to unsorted.
    pub fn toggle(current: Option<SortSpec>, key: SortKey) -> SortSpec {
        match current {
            Some(spec) if spec.key == key && spec.direction == SortDirection::Ascending => {
                SortSpec::descending(key)
            }
            _ => SortSpec::ascending(key),
        }
    }

    /// Header indicator for `key` under `current`.
    pub fn symbol(current: Option<SortSpec>, key: SortKey) -> &'static str {
        match current {
            Some(spec) if spec.key == key => match spec.direction {
                SortDirection::Ascending => "▲",
                SortDirection::Descending => "▼",
            },
            _ => "⇅",
        }
    }

    /// Stable in-place sort of `cities` by this spec.
    pub fn apply(self, cities: &mut Vec<&City>) {
        let mut keyed: Vec<(String, &City)> = cities
            .drain(..)
            .map(|c| (self.key.sort_value(c), c))
            .collect();

        // sort_by is stable; equal keys keep their relative order in both directions
        match self.direction {
            SortDirection::Ascending => keyed.sort_by(|a, b| a.0.cmp(&b.0)),
            SortDirection::Descending => keyed.sort_by(|a, b| b.0.cmp(&a.0)),
        }

        cities.extend(keyed.into_iter().map(|(_, c)| c));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(name: &str, country: &str) -> City {
        City::new(name, country, "UTC")
    }

    #[test]
    fn test_first_click_sorts_ascending() {
        assert_eq!(
            SortSpec::toggle(None, SortKey::Name),
            SortSpec::ascending(SortKey::Name)
        );
    }

    #[test]
    fn test_second_click_sorts_descending() {
        let first = SortSpec::toggle(None, SortKey::Country);
        let second = SortSpec::toggle(Some(first), SortKey::Country);
        assert_eq!(second, SortSpec::descending(SortKey::Country));
    }

    #[test]
    fn test_third_click_returns_to_ascending() {
        let spec = SortSpec::toggle(Some(SortSpec::descending(SortKey::Name)), SortKey::Name);
        assert_eq!(spec, SortSpec::ascending(SortKey::Name));
    }

    #[test]
    fn test_other_column_always_ascending() {
        for prior in [
            SortSpec::ascending(SortKey::Name),
            SortSpec::descending(SortKey::Name),
        ] {
            assert_eq!(
                SortSpec::toggle(Some(prior), SortKey::Timezone),
                SortSpec::ascending(SortKey::Timezone)
            );
        }
    }

    #[test]
    fn test_symbols() {
        assert_eq!(SortSpec::symbol(None, SortKey::Name), "⇅");
        let asc = Some(SortSpec::ascending(SortKey::Name));
        assert_eq!(SortSpec::symbol(asc, SortKey::Name), "▲");
        assert_eq!(SortSpec::symbol(asc, SortKey::Country), "⇅");
        let desc = Some(SortSpec::descending(SortKey::Name));
        assert_eq!(SortSpec::symbol(desc, SortKey::Name), "▼");
    }

    #[test]
    fn test_apply_is_case_insensitive() {
        let cities = [city("bravo", "X"), city("Alpha", "X"), city("charlie", "X")];
        let mut refs: Vec<&City> = cities.iter().collect();
        SortSpec::ascending(SortKey::Name).apply(&mut refs);
        let names: Vec<&str> = refs.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "bravo", "charlie"]);
    }

    #[test]
    fn test_apply_is_stable_in_both_directions() {
        let cities = [
            city("Paris", "France"),
            city("Berlin", "Germany"),
            city("Lyon", "France"),
            city("Hamburg", "Germany"),
        ];

        let mut asc: Vec<&City> = cities.iter().collect();
        SortSpec::ascending(SortKey::Country).apply(&mut asc);
        let names: Vec<&str> = asc.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Paris", "Lyon", "Berlin", "Hamburg"]);

        let mut desc: Vec<&City> = cities.iter().collect();
        SortSpec::descending(SortKey::Country).apply(&mut desc);
        let names: Vec<&str> = desc.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Berlin", "Hamburg", "Paris", "Lyon"]);
    }

    #[test]
    fn test_parse_sort_key() {
        assert_eq!("Name".parse::<SortKey>(), Ok(SortKey::Name));
        assert_eq!(" timezone ".parse::<SortKey>(), Ok(SortKey::Timezone));
        assert!("population".parse::<SortKey>().is_err());
    }
}
