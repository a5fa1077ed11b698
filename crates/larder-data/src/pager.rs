use std::sync::Arc;

use larder_db::Database;
use larder_db::models::MinimalMealRow;
use larder_types::MinimalMeal;

use crate::mediator::{LoadKind, MediatorError, PagingState, SearchMediator};
use crate::remote::RemoteSource;

/// Drives the [`SearchMediator`] and reads result pages back out of the
/// cached table. One pager per query; `snapshot` is what a list screen
/// renders.
pub struct SearchPager<A> {
    mediator: SearchMediator<A>,
    db: Arc<Database>,
    query: String,
    page_size: usize,
    loaded: Vec<MinimalMeal>,
    end_of_pagination: bool,
}

impl<A: RemoteSource> SearchPager<A> {
    pub fn new(api: A, db: Arc<Database>, query: impl Into<String>, page_size: usize) -> Self {
        let query = query.into();
        Self {
            mediator: SearchMediator::new(api, db.clone(), query.clone()),
            db,
            query,
            page_size,
            loaded: Vec::new(),
            end_of_pagination: false,
        }
    }

    /// Drop everything and load the first page. Also the manual
    /// recovery path after an error.
    pub async fn refresh(&mut self) -> Result<(), MediatorError> {
        let outcome = self.mediator.load(LoadKind::Refresh, &self.state()).await?;
        self.end_of_pagination = outcome.end_of_pagination;
        self.loaded = self.read_from(0)?;
        Ok(())
    }

    /// Fetch and append the next page. A no-op once pagination has
    /// ended.
    pub async fn load_more(&mut self) -> Result<(), MediatorError> {
        if self.end_of_pagination {
            return Ok(());
        }

        let outcome = self.mediator.load(LoadKind::Append, &self.state()).await?;
        self.end_of_pagination = outcome.end_of_pagination;
        let next = self.read_from(self.loaded.len())?;
        self.loaded.extend(next);
        Ok(())
    }

    pub fn snapshot(&self) -> &[MinimalMeal] {
        &self.loaded
    }

    pub fn end_of_pagination(&self) -> bool {
        self.end_of_pagination
    }

    fn state(&self) -> PagingState {
        PagingState {
            loaded: self.loaded.clone(),
            page_size: self.page_size,
        }
    }

    fn read_from(&self, offset: usize) -> Result<Vec<MinimalMeal>, MediatorError> {
        let rows = self
            .db
            .search_cache_page(&self.query, self.page_size, offset)?;
        Ok(rows.into_iter().map(MinimalMealRow::into_model).collect())
    }
}
