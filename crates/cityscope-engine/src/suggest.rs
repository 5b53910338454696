//! Search-box suggestions.
//!
//! Suggestions are an independent query against page 1 of the directory and
//! never touch the paginated collection.

use cityscope_directory::{City, CitySource};

use crate::view::dedup_by_name;

/// Trimmed, lower-cased query, or `None` when nothing is left to match.
pub fn normalize_query(query: &str) -> Option<String> {
    let normalized = query.trim().to_lowercase();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// De-duplicate `cities` and keep names starting with `prefix`.
///
/// `prefix` must already be normalized.
pub fn match_suggestions(cities: Vec<City>, prefix: &str) -> Vec<City> {
    dedup_by_name(cities)
        .into_iter()
        .filter(|c| c.name.to_lowercase().starts_with(prefix))
        .collect()
}

/// Fetch suggestions for `query`.
///
/// An empty or whitespace-only query resolves to no suggestions without a
/// request. Fetch failures are logged and also yield no suggestions.
pub async fn fetch_suggestions<S>(source: &S, query: &str) -> Vec<City>
where
    S: CitySource + ?Sized,
{
    let Some(prefix) = normalize_query(query) else {
        return Vec::new();
    };

    match source.fetch_page(1).await {
        Ok(cities) => {
            let matches = match_suggestions(cities, &prefix);
            tracing::debug!("{} suggestions for '{}'", matches.len(), prefix);
            matches
        }
        Err(e) => {
            tracing::warn!("Suggestion lookup for '{}' failed: {}", prefix, e);
            Vec::new()
        }
    }
}
