//! List state container and its transitions.
//!
//! All mutation goes through [`ListState::dispatch`] or the named transition
//! methods it is built from. Fetching is left to the caller: a transition that
//! needs a page returns [`ListCommand::FetchPage`] and the caller reports the
//! result back with [`ListAction::PageLoaded`].

use cityscope_directory::{City, DirectoryError};

use crate::sort::{SortKey, SortSpec};
use crate::view::{facets, recompute_view, Facets, FilterCriteria};
use crate::viewport::Viewport;

/// Pagination position.
///
/// `page` is the next page to request and only grows. Once `exhausted` is set
/// no further page is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub page: u32,
    pub exhausted: bool,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self {
            page: 1,
            exhausted: false,
        }
    }
}

/// Inputs to the list state
#[derive(Debug)]
pub enum ListAction {
    /// The list became visible; loads the first page.
    Mount,
    /// The host reported a new scroll position.
    ViewportChanged(Viewport),
    PageLoaded {
        page: u32,
        result: Result<Vec<City>, DirectoryError>,
    },
    SearchChanged(String),
    CountrySelected(String),
    TimezoneSelected(String),
    HeaderClicked(SortKey),
    SuggestionsLoaded(Vec<City>),
    SuggestionsCleared,
}

/// Side effects requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListCommand {
    FetchPage(u32),
}

/// What a completed page fetch did to the collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Appended { page: u32, count: usize },
    Exhausted { page: u32 },
    /// The fetch failed. Treated like exhaustion: pagination stops.
    Failed { page: u32, reason: String },
    /// Result for a page that is not the one in flight; dropped.
    Ignored { page: u32 },
}

#[derive(Debug, Clone, Default)]
pub struct ListState {
    cities: Vec<City>,
    cursor: PageCursor,
    criteria: FilterCriteria,
    sort: Option<SortSpec>,
    loading: bool,
    suggestions: Vec<City>,
    view: Vec<City>,
}

impl ListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one action, returning the side effect it needs, if any.
    pub fn dispatch(&mut self, action: ListAction) -> Option<ListCommand> {
        match action {
            ListAction::Mount => self.begin_page_load().map(ListCommand::FetchPage),
            ListAction::ViewportChanged(viewport) => {
                if self.wants_next_page(&viewport) {
                    self.begin_page_load().map(ListCommand::FetchPage)
                } else {
                    None
                }
            }
            ListAction::PageLoaded { page, result } => {
                self.apply_page(page, result);
                None
            }
            ListAction::SearchChanged(term) => {
                self.set_search_term(term);
                None
            }
            ListAction::CountrySelected(country) => {
                self.set_country(country);
                None
            }
            ListAction::TimezoneSelected(timezone) => {
                self.set_timezone(timezone);
                None
            }
            ListAction::HeaderClicked(key) => {
                self.request_sort(key);
                None
            }
            ListAction::SuggestionsLoaded(cities) => {
                self.set_suggestions(cities);
                None
            }
            ListAction::SuggestionsCleared => {
                self.clear_suggestions();
                None
            }
        }
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor.exhausted
    }

    pub fn suggestions(&self) -> &[City] {
        &self.suggestions
    }

    /// Current table rows
    pub fn view(&self) -> &[City] {
        &self.view
    }

    pub fn facets(&self) -> Facets {
        facets(&self.cities)
    }

    /// A new page may be requested right now.
    pub fn can_load(&self) -> bool {
        !self.loading && !self.cursor.exhausted
    }

    /// Scroll trigger: at the bottom and allowed to load.
    pub fn wants_next_page(&self, viewport: &Viewport) -> bool {
        viewport.is_at_bottom() && self.can_load()
    }

    /// Admission control for page fetches.
    ///
    /// Marks the state as loading and returns the page to fetch, or `None`
    /// while another fetch is in flight or after exhaustion.
    pub fn begin_page_load(&mut self) -> Option<u32> {
        if !self.can_load() {
            return None;
        }
        self.loading = true;
        tracing::debug!("Requesting directory page {}", self.cursor.page);
        Some(self.cursor.page)
    }

    /// Fold a finished fetch of `page` into the state. Always clears `loading`.
    pub fn apply_page(
        &mut self,
        page: u32,
        result: Result<Vec<City>, DirectoryError>,
    ) -> PageOutcome {
        self.loading = false;

        if page != self.cursor.page || self.cursor.exhausted {
            tracing::debug!(
                "Dropping result for page {} (cursor at {})",
                page,
                self.cursor.page
            );
            return PageOutcome::Ignored { page };
        }

        match result {
            Ok(cities) if cities.is_empty() => {
                self.cursor.exhausted = true;
                tracing::info!("Directory exhausted at page {}", page);
                PageOutcome::Exhausted { page }
            }
            Ok(cities) => {
                let count = cities.len();
                self.cities.extend(cities);
                self.cursor.page += 1;
                self.refresh_view();
                tracing::info!(
                    "Loaded page {} ({} cities, {} total)",
                    page,
                    count,
                    self.cities.len()
                );
                PageOutcome::Appended { page, count }
            }
            Err(e) => {
                // A failed page is indistinguishable from the end of the data
                self.cursor.exhausted = true;
                tracing::warn!(
                    "Directory page {} failed ({}), stopping pagination: {}",
                    page,
                    if e.is_transient() { "transient" } else { "permanent" },
                    e
                );
                PageOutcome::Failed {
                    page,
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        if self.criteria.search_term != term {
            self.criteria.search_term = term;
            self.refresh_view();
        }
    }

    /// Empty string clears the constraint.
    pub fn set_country(&mut self, country: impl Into<String>) {
        let country = country.into();
        if self.criteria.country != country {
            self.criteria.country = country;
            self.refresh_view();
        }
    }

    /// Empty string clears the constraint.
    pub fn set_timezone(&mut self, timezone: impl Into<String>) {
        let timezone = timezone.into();
        if self.criteria.timezone != timezone {
            self.criteria.timezone = timezone;
            self.refresh_view();
        }
    }

    /// Header click: see [`SortSpec::toggle`].
    pub fn request_sort(&mut self, key: SortKey) -> SortSpec {
        let spec = SortSpec::toggle(self.sort, key);
        self.sort = Some(spec);
        self.refresh_view();
        spec
    }

    pub fn set_suggestions(&mut self, cities: Vec<City>) {
        self.suggestions = cities;
    }

    pub fn clear_suggestions(&mut self) {
        self.suggestions.clear();
    }

    fn refresh_view(&mut self) {
        self.view = recompute_view(&self.cities, &self.criteria, self.sort);
    }
}
