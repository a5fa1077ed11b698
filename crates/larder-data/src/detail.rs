use larder_client::error::ClientError;
use larder_types::{Meal, Resource};

use crate::remote::RemoteSource;

/// Online meal detail: a single fetch by id, never cached. The offline
/// counterpart is [`crate::bookmarks::BookmarkRepo::by_id`].
pub struct DetailRepo<A> {
    api: A,
}

impl<A: RemoteSource> DetailRepo<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub async fn meal_by_id(&self, id: &str) -> Result<Meal, ClientError> {
        self.api.meal_by_id(id).await
    }

    /// The outcome as a detail screen consumes it: success or an error
    /// message, with the caller holding `Loading` until this resolves.
    pub async fn fetch(&self, id: &str) -> Resource<Meal> {
        Resource::from_result(self.meal_by_id(id).await)
    }
}
