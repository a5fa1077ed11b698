use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use larder_client::error::ClientError;
use larder_db::Database;
use larder_db::models::MinimalMealRow;
use larder_types::MinimalMeal;

use crate::remote::RemoteSource;

/// What kind of page is being asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    Refresh,
    Prepend,
    Append,
}

/// Snapshot of what the pager has loaded so far, handed to the
/// mediator so it can derive the next page cursor.
#[derive(Debug, Clone, Default)]
pub struct PagingState {
    pub loaded: Vec<MinimalMeal>,
    pub page_size: usize,
}

impl PagingState {
    pub fn new(page_size: usize) -> Self {
        Self {
            loaded: Vec::new(),
            page_size,
        }
    }

    pub fn last_item(&self) -> Option<&MinimalMeal> {
        self.loaded.last()
    }
}

#[derive(Debug)]
pub struct LoadOutcome {
    pub end_of_pagination: bool,
}

#[derive(Debug, Error)]
pub enum MediatorError {
    #[error(transparent)]
    Remote(#[from] ClientError),
    #[error("local store failure: {0}")]
    Store(#[from] anyhow::Error),
}

/// Reconciles paged network results with the local search cache.
///
/// Refresh fetches the first page and swaps the whole cache for it in
/// one transaction. Append keys the next fetch off the last loaded
/// item's id and upserts the result. The API only pages forward, so
/// Prepend ends immediately. A page shorter than the configured size
/// means the server is out of results.
pub struct SearchMediator<A> {
    api: A,
    db: Arc<Database>,
    query: String,
}

impl<A: RemoteSource> SearchMediator<A> {
    pub fn new(api: A, db: Arc<Database>, query: impl Into<String>) -> Self {
        Self {
            api,
            db,
            query: query.into(),
        }
    }

    /// Errors are surfaced as-is, never retried; the caller decides
    /// whether to refresh again.
    pub async fn load(
        &self,
        kind: LoadKind,
        state: &PagingState,
    ) -> Result<LoadOutcome, MediatorError> {
        let page = match kind {
            LoadKind::Refresh => None,
            LoadKind::Prepend => {
                return Ok(LoadOutcome {
                    end_of_pagination: true,
                });
            }
            LoadKind::Append => match state.last_item() {
                None => {
                    return Ok(LoadOutcome {
                        end_of_pagination: true,
                    });
                }
                Some(last) => Some(last.id.clone()),
            },
        };

        let fetched = self.api.search_meals(&self.query, page.as_deref()).await?;
        let end_of_pagination = fetched.len() < state.page_size;
        debug!(
            "search '{}': fetched {} rows (end of pagination: {})",
            self.query,
            fetched.len(),
            end_of_pagination
        );

        let rows: Vec<MinimalMealRow> = fetched.iter().map(MinimalMealRow::from_model).collect();
        match kind {
            LoadKind::Refresh => self.db.replace_search_cache(&rows)?,
            _ => self.db.append_search_cache(&rows)?,
        }

        Ok(LoadOutcome { end_of_pagination })
    }
}
