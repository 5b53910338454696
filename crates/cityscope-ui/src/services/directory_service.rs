//! Directory backend: async page and suggestion fetches.
//! All network work runs off the UI thread; results sent via mpsc.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use cityscope_directory::{City, CitySource, DirectoryError};
use cityscope_engine::fetch_suggestions;
use tokio::runtime::Handle;

/// Messages sent from async operations back to the UI thread
#[derive(Debug)]
pub enum DirectoryServiceMessage {
    /// Result of fetching one directory page
    PageDone {
        page: u32,
        result: Result<Vec<City>, DirectoryError>,
    },
    /// Suggestions for `query`, already prefix-matched
    SuggestionsDone { query: String, cities: Vec<City> },
}

/// Request page `page` asynchronously.
/// Sends `PageDone` on the channel when complete.
pub fn request_page(
    tx: &Sender<DirectoryServiceMessage>,
    source: Arc<dyn CitySource>,
    runtime: &Handle,
    page: u32,
) {
    let tx = tx.clone();
    runtime.spawn(async move {
        let result = source.fetch_page(page).await;
        let _ = tx.send(DirectoryServiceMessage::PageDone { page, result });
    });
}

/// Request suggestions for `query` asynchronously.
/// Sends `SuggestionsDone` on the channel when complete.
pub fn request_suggestions(
    tx: &Sender<DirectoryServiceMessage>,
    source: Arc<dyn CitySource>,
    runtime: &Handle,
    query: String,
) {
    let tx = tx.clone();
    runtime.spawn(async move {
        let cities = fetch_suggestions(source.as_ref(), &query).await;
        let _ = tx.send(DirectoryServiceMessage::SuggestionsDone { query, cities });
    });
}
