use std::sync::Arc;

use async_stream::stream;
use futures_util::Stream;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use larder_client::error::ClientError;
use larder_db::models::CategoryRow;
use larder_db::{Change, Database};
use larder_types::{Category, MinimalMeal};

use crate::remote::RemoteSource;

/// Backs the browse screen: a random meal pick and the category list.
pub struct HomeRepo<A> {
    api: A,
    db: Arc<Database>,
}

impl<A: RemoteSource> HomeRepo<A> {
    pub fn new(api: A, db: Arc<Database>) -> Self {
        Self { api, db }
    }

    pub async fn random_meal(&self) -> Result<Vec<MinimalMeal>, ClientError> {
        self.api.random_meal().await
    }

    /// Read-through category stream. Emits the cached list; when the
    /// cache is empty on first read it runs one fetch-and-store and
    /// emits the populated list instead. After that it re-emits on
    /// every category-table change. A failed fetch degrades to the
    /// empty emission — recovery is the caller subscribing again.
    ///
    /// There is no freshness policy: a populated cache is trusted until
    /// the app's storage is reset.
    pub fn categories(&self) -> impl Stream<Item = Vec<Category>> + '_ {
        stream! {
            let mut current = self.load_cached();
            if current.is_empty() {
                match self.refresh_categories().await {
                    Ok(()) => current = self.load_cached(),
                    Err(e) => warn!("category refresh failed: {e}"),
                }
            }

            let mut changes = self.db.subscribe();
            yield current;

            loop {
                match changes.recv().await {
                    Ok(Change::Categories) => yield self.load_cached(),
                    Ok(_) => {}
                    Err(RecvError::Lagged(_)) => yield self.load_cached(),
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    fn load_cached(&self) -> Vec<Category> {
        match self.db.categories() {
            Ok(rows) => rows.into_iter().map(CategoryRow::into_model).collect(),
            Err(e) => {
                warn!("category cache read failed: {e}");
                Vec::new()
            }
        }
    }

    async fn refresh_categories(&self) -> anyhow::Result<()> {
        let fetched = self.api.categories().await?;
        let rows: Vec<CategoryRow> = fetched.iter().map(CategoryRow::from_model).collect();
        self.db.upsert_categories(&rows)?;
        info!("cached {} categories", rows.len());
        Ok(())
    }
}
