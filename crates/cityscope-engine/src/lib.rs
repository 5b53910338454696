//! City list engine
//!
//! Owns the accumulated city collection, its pagination cursor and the
//! filter/sort criteria, and derives the de-duplicated view the table renders.
//!
//! [`ListState`] is the synchronous reducer; [`CityListEngine`] drives it
//! against a [`CitySource`] for callers that can simply await.

pub mod engine;
pub mod sort;
pub mod state;
pub mod suggest;
pub mod view;
pub mod viewport;

pub use cityscope_directory::{City, CitySource, DirectoryError};
pub use engine::CityListEngine;
pub use sort::{SortDirection, SortKey, SortSpec};
pub use state::{ListAction, ListCommand, ListState, PageCursor, PageOutcome};
pub use suggest::{fetch_suggestions, match_suggestions, normalize_query};
pub use view::{dedup_by_name, facets, recompute_view, Facets, FilterCriteria};
pub use viewport::Viewport;
