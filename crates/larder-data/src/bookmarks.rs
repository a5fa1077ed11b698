use std::sync::Arc;

use anyhow::Result;
use futures_util::Stream;
use tracing::warn;

use larder_db::models::BookmarkRow;
use larder_db::{Change, Database};
use larder_types::Meal;

use crate::observe;

/// Pass-through to the bookmark table. A bookmark is a full meal
/// duplicated into local storage so it stays viewable offline; the
/// row's existence is the "is bookmarked" flag.
pub struct BookmarkRepo {
    db: Arc<Database>,
}

impl BookmarkRepo {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn save(&self, meal: &Meal) -> Result<()> {
        self.db.upsert_bookmark(&BookmarkRow::from_meal(meal))
    }

    pub fn remove(&self, id: &str) -> Result<()> {
        self.db.delete_bookmark(id)
    }

    pub fn clear_all(&self) -> Result<()> {
        self.db.clear_bookmarks()
    }

    pub fn is_bookmarked(&self, id: &str) -> Result<bool> {
        self.db.is_bookmarked(id)
    }

    pub fn by_id(&self, id: &str) -> Result<Option<Meal>> {
        Ok(self.db.bookmark_by_id(id)?.map(BookmarkRow::into_meal))
    }

    /// All bookmarks, newest first, re-emitted on every change.
    pub fn all(&self) -> impl Stream<Item = Vec<Meal>> + '_ {
        observe(&self.db, Change::Bookmarks, || match self.db.bookmarks() {
            Ok(rows) => rows.into_iter().map(BookmarkRow::into_meal).collect(),
            Err(e) => {
                warn!("bookmark read failed: {e}");
                Vec::new()
            }
        })
    }

    /// Observable flag for one meal id; detail screens watch this to
    /// tint their bookmark control.
    pub fn watch_bookmarked(&self, id: &str) -> impl Stream<Item = bool> + '_ {
        let id = id.to_string();
        observe(&self.db, Change::Bookmarks, move || {
            self.db.is_bookmarked(&id).unwrap_or(false)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    fn meal(id: &str, name: &str) -> Meal {
        Meal {
            id: id.into(),
            name: name.into(),
            ..Meal::default()
        }
    }

    #[tokio::test]
    async fn save_then_query_then_remove() {
        let repo = BookmarkRepo::new(Arc::new(Database::open_in_memory().unwrap()));
        let pie = meal("52874", "Beef and Mustard Pie");

        assert!(!repo.is_bookmarked("52874").unwrap());

        repo.save(&pie).unwrap();
        assert!(repo.is_bookmarked("52874").unwrap());
        assert!(repo.by_id("52874").unwrap().unwrap().bookmarked);

        repo.remove("52874").unwrap();
        assert!(!repo.is_bookmarked("52874").unwrap());
        assert!(repo.by_id("52874").unwrap().is_none());
    }

    #[tokio::test]
    async fn watch_bookmarked_flips_with_the_row() {
        let repo = BookmarkRepo::new(Arc::new(Database::open_in_memory().unwrap()));

        let watched = repo.watch_bookmarked("52874");
        futures_util::pin_mut!(watched);
        assert!(!watched.next().await.unwrap());

        repo.save(&meal("52874", "Beef and Mustard Pie")).unwrap();
        assert!(watched.next().await.unwrap());

        repo.remove("52874").unwrap();
        assert!(!watched.next().await.unwrap());
    }

    #[tokio::test]
    async fn all_reemits_after_clear() {
        let repo = BookmarkRepo::new(Arc::new(Database::open_in_memory().unwrap()));
        repo.save(&meal("1", "One")).unwrap();
        repo.save(&meal("2", "Two")).unwrap();

        let all = repo.all();
        futures_util::pin_mut!(all);
        assert_eq!(all.next().await.unwrap().len(), 2);

        repo.clear_all().unwrap();
        assert!(all.next().await.unwrap().is_empty());
    }
}
