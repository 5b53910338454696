use std::ops::Range;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;

use cityscope_directory::{City, CitySource};
use cityscope_engine::{
    normalize_query, Facets, ListAction, ListCommand, ListState, SortKey, SortSpec, Viewport,
};
use tokio::runtime::Handle;

use crate::bridge;
use crate::router::Route;
use crate::services::{
    request_directory_page, request_directory_suggestions, DirectoryServiceMessage,
};

pub const LOADING_TEXT: &str = "Loading...";
pub const EXHAUSTED_TEXT: &str = "No more cities to load.";

/// View model behind the city table.
///
/// Fetches run on the shared runtime and report back through an mpsc channel
/// drained by [`CityTableModel::poll_channel`]. Each instance owns its own
/// pagination, so building a fresh model restarts from page 1.
pub struct CityTableModel {
    state: ListState,
    viewport: Viewport,
    source: Option<Arc<dyn CitySource>>,
    runtime: Option<Handle>,
    tx: Sender<DirectoryServiceMessage>,
    rx: Receiver<DirectoryServiceMessage>,
    pending_suggestions: usize,
    error_message: Option<String>,
}

impl CityTableModel {
    /// Model backed by the services published in [`bridge`].
    pub fn new(rows_per_screen: u32) -> Self {
        match bridge::get_directory_service() {
            Some((source, runtime)) => Self::with_services(source, runtime, rows_per_screen),
            None => Self::build(None, None, rows_per_screen),
        }
    }

    pub fn with_services(
        source: Arc<dyn CitySource>,
        runtime: Handle,
        rows_per_screen: u32,
    ) -> Self {
        Self::build(Some(source), Some(runtime), rows_per_screen)
    }

    fn build(
        source: Option<Arc<dyn CitySource>>,
        runtime: Option<Handle>,
        rows_per_screen: u32,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            state: ListState::new(),
            viewport: Viewport::new(0, rows_per_screen, 0),
            source,
            runtime,
            tx,
            rx,
            pending_suggestions: 0,
            error_message: None,
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn rows(&self) -> &[City] {
        self.state.view()
    }

    /// Rows inside the viewport, with their absolute index
    pub fn visible_rows(&self) -> (Range<usize>, &[City]) {
        let range = self.viewport.visible_range();
        let rows = self.state.view().get(range.clone()).unwrap_or(&[]);
        (range, rows)
    }

    pub fn suggestions(&self) -> &[City] {
        self.state.suggestions()
    }

    pub fn facets(&self) -> Facets {
        self.state.facets()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Header text for `key`, including its sort indicator
    pub fn column_header(&self, key: SortKey) -> String {
        format!("{} {}", key.label(), SortSpec::symbol(self.state.sort(), key))
    }

    pub fn footer_text(&self) -> Option<&'static str> {
        if self.state.is_loading() {
            Some(LOADING_TEXT)
        } else if self.state.is_exhausted() {
            Some(EXHAUSTED_TEXT)
        } else {
            None
        }
    }

    /// Fetches are still in flight.
    pub fn is_busy(&self) -> bool {
        self.state.is_loading() || self.pending_suggestions > 0
    }

    /// Start loading the first page.
    pub fn mount(&mut self) {
        let command = self.state.dispatch(ListAction::Mount);
        self.execute(command);
    }

    /// Move the viewport by `delta` rows; loads the next page at the bottom.
    pub fn scroll_by(&mut self, delta: i64) {
        self.viewport = self.viewport.scrolled_by(delta);
        self.notify_viewport();
    }

    pub fn scroll_to_bottom(&mut self) {
        self.viewport = self.viewport.scrolled_to_bottom();
        self.notify_viewport();
    }

    /// Update the search box: filters the table and refreshes suggestions.
    pub fn type_search(&mut self, term: &str) {
        self.state
            .dispatch(ListAction::SearchChanged(term.to_string()));
        self.sync_viewport();

        if normalize_query(term).is_none() {
            self.state.dispatch(ListAction::SuggestionsCleared);
            return;
        }

        match self.services() {
            Some((source, runtime)) => {
                self.pending_suggestions += 1;
                request_directory_suggestions(&self.tx, source, &runtime, term.to_string());
            }
            None => self.set_not_initialized(),
        }
    }

    /// Empty string clears the constraint.
    pub fn select_country(&mut self, country: &str) {
        self.state
            .dispatch(ListAction::CountrySelected(country.to_string()));
        self.sync_viewport();
    }

    /// Empty string clears the constraint.
    pub fn select_timezone(&mut self, timezone: &str) {
        self.state
            .dispatch(ListAction::TimezoneSelected(timezone.to_string()));
        self.sync_viewport();
    }

    pub fn click_header(&mut self, key: SortKey) {
        self.state.dispatch(ListAction::HeaderClicked(key));
    }

    /// Route for the row at `index` of the current view.
    pub fn row_route(&self, index: usize) -> Option<Route> {
        self.state
            .view()
            .get(index)
            .map(|city| Route::weather(&city.name))
    }

    /// Drain finished fetches into the state. Returns true if anything arrived.
    pub fn poll_channel(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.rx.try_recv() {
                Ok(DirectoryServiceMessage::PageDone { page, result }) => {
                    self.state.dispatch(ListAction::PageLoaded { page, result });
                    self.sync_viewport();
                    changed = true;
                }
                Ok(DirectoryServiceMessage::SuggestionsDone { query, cities }) => {
                    self.pending_suggestions = self.pending_suggestions.saturating_sub(1);
                    tracing::debug!("{} suggestions arrived for '{}'", cities.len(), query);
                    // Last to resolve wins, whatever order the queries were typed in
                    self.state.dispatch(ListAction::SuggestionsLoaded(cities));
                    changed = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        changed
    }

    fn notify_viewport(&mut self) {
        let command = self
            .state
            .dispatch(ListAction::ViewportChanged(self.viewport));
        self.execute(command);
    }

    fn execute(&mut self, command: Option<ListCommand>) {
        let Some(ListCommand::FetchPage(page)) = command else {
            return;
        };

        match self.services() {
            Some((source, runtime)) => request_directory_page(&self.tx, source, &runtime, page),
            None => {
                // Nothing will answer; leave the list idle instead of stuck loading
                self.state.apply_page(page, Ok(Vec::new()));
                self.set_not_initialized();
            }
        }
    }

    fn services(&self) -> Option<(Arc<dyn CitySource>, Handle)> {
        self.source.clone().zip(self.runtime.clone())
    }

    fn set_not_initialized(&mut self) {
        tracing::error!("Directory service not initialized");
        self.error_message = Some("Directory service not initialized".to_string());
    }

    fn sync_viewport(&mut self) {
        let height = u32::try_from(self.state.view().len()).unwrap_or(u32::MAX);
        self.viewport = self.viewport.with_content_height(height);
    }
}
