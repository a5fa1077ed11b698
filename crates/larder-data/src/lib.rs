pub mod bookmarks;
pub mod config;
pub mod detail;
pub mod filters;
pub mod home;
pub mod mediator;
pub mod pager;
pub mod recipes;
pub mod remote;
pub mod settings;

use std::sync::Arc;

use anyhow::Result;
use async_stream::stream;
use futures_util::Stream;
use tokio::sync::broadcast::error::RecvError;

use larder_client::MealApi;
use larder_db::{Change, Database};

pub use config::Config;
pub use remote::RemoteSource;

use crate::bookmarks::BookmarkRepo;
use crate::detail::DetailRepo;
use crate::filters::FilterRepo;
use crate::home::HomeRepo;
use crate::pager::SearchPager;
use crate::recipes::RecipeRepo;
use crate::settings::SettingsStore;

/// Everything a UI shell needs, built once from [`Config`]: the remote
/// client, the local store, the settings file, and accessors for the
/// per-screen repositories.
pub struct Larder {
    api: MealApi,
    db: Arc<Database>,
    settings: SettingsStore,
    config: Config,
}

impl Larder {
    pub fn open(config: Config) -> Result<Self> {
        let api = MealApi::new(config.base_url.clone())?;
        let db = Arc::new(Database::open(&config.db_path)?);
        let settings = SettingsStore::open(config.settings_path.clone());

        Ok(Self {
            api,
            db,
            settings,
            config,
        })
    }

    pub fn home(&self) -> HomeRepo<MealApi> {
        HomeRepo::new(self.api.clone(), self.db.clone())
    }

    pub fn detail(&self) -> DetailRepo<MealApi> {
        DetailRepo::new(self.api.clone())
    }

    pub fn filters(&self) -> FilterRepo<MealApi> {
        FilterRepo::new(self.api.clone())
    }

    pub fn bookmarks(&self) -> BookmarkRepo {
        BookmarkRepo::new(self.db.clone())
    }

    pub fn recipes(&self) -> RecipeRepo {
        RecipeRepo::new(self.db.clone())
    }

    /// A pager for one search query. Each query gets its own pager; the
    /// cached table holds whichever query was loaded last.
    pub fn search(&self, query: impl Into<String>) -> SearchPager<MealApi> {
        SearchPager::new(
            self.api.clone(),
            self.db.clone(),
            query,
            self.config.page_size,
        )
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }
}

/// Observable query over one table: emit the current read immediately,
/// then re-read on every matching change. The stream ends when the
/// database is dropped; a dropped stream just stops listening.
pub(crate) fn observe<T, F>(db: &Database, table: Change, read: F) -> impl Stream<Item = T>
where
    F: Fn() -> T,
{
    stream! {
        let mut changes = db.subscribe();
        yield read();

        loop {
            match changes.recv().await {
                Ok(change) if change == table => yield read(),
                Ok(_) => {}
                // Missed notifications collapse into one re-read.
                Err(RecvError::Lagged(_)) => yield read(),
                Err(RecvError::Closed) => break,
            }
        }
    }
}
