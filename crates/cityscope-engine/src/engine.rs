//! Async driver around [`ListState`] for callers that can await a source
//! directly (the CLI and tests). The interactive UI drives [`ListState`]
//! through its own service channel instead.

use cityscope_directory::{City, CitySource};

use crate::state::{ListAction, ListCommand, ListState, PageOutcome};
use crate::suggest::fetch_suggestions;
use crate::viewport::Viewport;

pub struct CityListEngine<S: CitySource> {
    source: S,
    state: ListState,
}

impl<S: CitySource> CityListEngine<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: ListState::new(),
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ListState {
        &mut self.state
    }

    /// Current table rows
    pub fn view(&self) -> &[City] {
        self.state.view()
    }

    /// Load the first page.
    pub async fn mount(&mut self) -> Option<PageOutcome> {
        let command = self.state.dispatch(ListAction::Mount);
        self.run(command).await
    }

    /// Fetch the next page unless a fetch is running or pagination has ended.
    pub async fn load_next_page(&mut self) -> Option<PageOutcome> {
        let page = self.state.begin_page_load()?;
        Some(self.fetch(page).await)
    }

    /// Report a scroll position; loads a page when it reaches the bottom.
    pub async fn on_scroll(&mut self, viewport: Viewport) -> Option<PageOutcome> {
        let command = self.state.dispatch(ListAction::ViewportChanged(viewport));
        self.run(command).await
    }

    /// Load up to `max_pages` pages, stopping early once exhausted.
    /// Returns how many pages added cities.
    pub async fn load_pages(&mut self, max_pages: u32) -> u32 {
        let mut appended = 0;
        for _ in 0..max_pages {
            match self.load_next_page().await {
                Some(PageOutcome::Appended { .. }) => appended += 1,
                _ => break,
            }
        }
        appended
    }

    /// Refresh suggestions for `query` and return them.
    pub async fn suggestions(&mut self, query: &str) -> &[City] {
        let cities = fetch_suggestions(&self.source, query).await;
        if cities.is_empty() {
            self.state.dispatch(ListAction::SuggestionsCleared);
        } else {
            self.state.dispatch(ListAction::SuggestionsLoaded(cities));
        }
        self.state.suggestions()
    }

    async fn run(&mut self, command: Option<ListCommand>) -> Option<PageOutcome> {
        match command? {
            ListCommand::FetchPage(page) => Some(self.fetch(page).await),
        }
    }

    async fn fetch(&mut self, page: u32) -> PageOutcome {
        let result = self.source.fetch_page(page).await;
        self.state.apply_page(page, result)
    }
}
