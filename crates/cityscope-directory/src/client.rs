//! Open data portal client for the geonames city dataset.

use std::cmp::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use cityscope_core::{DirectoryConfig, ReqwestErrorExt};
use icu_collator::{Collator, CollatorOptions};
use tracing::instrument;

use crate::error::DirectoryError;
use crate::source::CitySource;
use crate::types::{City, SearchResponse};

const SEARCH_PATH: &str = "/api/records/1.0/search/";

#[derive(Debug, Clone)]
pub struct DirectoryClient {
    client: reqwest::Client,
    base_url: String,
    dataset: String,
    page_size: u32,
}

impl DirectoryClient {
    pub fn new(config: &DirectoryConfig) -> Result<Self, DirectoryError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| DirectoryError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            dataset: config.dataset.clone(),
            page_size: config.page_size,
        })
    }

    /// Client against an arbitrary host with the default dataset.
    pub fn with_base_url(base_url: &str, page_size: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            dataset: DirectoryConfig::default().dataset,
            page_size,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Record offset of the first row of `page` (1-based).
    pub fn page_offset(&self, page: u32) -> u64 {
        u64::from(page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Fetch one page of cities, ordered by name descending.
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch_page(&self, page: u32) -> Result<Vec<City>, DirectoryError> {
        let url = format!("{}{}", self.base_url, SEARCH_PATH);
        let rows = self.page_size.to_string();
        let start = self.page_offset(page).to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("dataset", self.dataset.as_str()),
                ("q", ""),
                ("rows", rows.as_str()),
                ("start", start.as_str()),
            ])
            .send()
            .await
            .map_err(|e| DirectoryError::Network(e.into_network_error()))?;

        let body: SearchResponse = Self::handle_response(response).await?;

        let mut cities: Vec<City> = body.records.into_iter().map(City::from).collect();
        sort_names_descending(&mut cities);

        tracing::debug!("Fetched {} cities for page {}", cities.len(), page);
        Ok(cities)
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, DirectoryError> {
        let status = response.status();

        if status.is_success() {
            let bytes = response
                .bytes()
                .await
                .map_err(|e| DirectoryError::Network(e.into_network_error()))?;
            serde_json::from_slice(&bytes).map_err(|e| DirectoryError::Parse(e.to_string()))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(DirectoryError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// Order a page by name, descending, using root-locale collation
/// (accents sort with their base letter, lowercase before uppercase).
fn sort_names_descending(cities: &mut [City]) {
    match Collator::try_new(&Default::default(), CollatorOptions::new()) {
        Ok(collator) => cities.sort_by(|a, b| collator.compare(&b.name, &a.name)),
        Err(e) => {
            tracing::warn!("Collator unavailable ({}), ordering names by code point", e);
            cities.sort_by(|a, b| fallback_order(b, a));
        }
    }
}

/// Case-insensitive name order, falling back to the raw name so the order is total.
fn fallback_order(a: &City, b: &City) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

#[async_trait]
impl CitySource for DirectoryClient {
    async fn fetch_page(&self, page: u32) -> Result<Vec<City>, DirectoryError> {
        DirectoryClient::fetch_page(self, page).await
    }
}
