use async_trait::async_trait;

use crate::{City, DirectoryError};

/// Anything that can serve numbered pages of cities.
///
/// Pages are 1-based. An empty `Ok` page means the directory has nothing more.
#[async_trait]
pub trait CitySource: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<Vec<City>, DirectoryError>;
}

#[async_trait]
impl<T: CitySource + ?Sized> CitySource for std::sync::Arc<T> {
    async fn fetch_page(&self, page: u32) -> Result<Vec<City>, DirectoryError> {
        (**self).fetch_page(page).await
    }
}
