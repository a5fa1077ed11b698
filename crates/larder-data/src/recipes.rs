use std::sync::Arc;

use anyhow::Result;
use futures_util::Stream;
use tracing::warn;

use larder_db::models::RecipeRow;
use larder_db::{Change, Database};
use larder_types::UserRecipe;

use crate::observe;

/// Pass-through CRUD for user-authored recipes — the only durable
/// user-owned data in the store. Writes are last-write-wins.
pub struct RecipeRepo {
    db: Arc<Database>,
}

impl RecipeRepo {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Returns the store-assigned id.
    pub fn create(&self, recipe: &UserRecipe) -> Result<i64> {
        self.db.insert_recipe(&RecipeRow::from_model(recipe))
    }

    pub fn get(&self, id: i64) -> Result<Option<UserRecipe>> {
        Ok(self.db.recipe_by_id(id)?.map(RecipeRow::into_model))
    }

    pub fn update(&self, recipe: &UserRecipe) -> Result<()> {
        self.db.update_recipe(&RecipeRow::from_model(recipe))
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        self.db.delete_recipe(id)
    }

    /// All recipes, newest first, re-emitted after every recipe
    /// mutation.
    pub fn all(&self) -> impl Stream<Item = Vec<UserRecipe>> + '_ {
        observe(&self.db, Change::Recipes, || match self.db.recipes() {
            Ok(rows) => rows.into_iter().map(RecipeRow::into_model).collect(),
            Err(e) => {
                warn!("recipe read failed: {e}");
                Vec::new()
            }
        })
    }

    /// One recipe as the edit screen watches it; `None` once deleted.
    pub fn watch(&self, id: i64) -> impl Stream<Item = Option<UserRecipe>> + '_ {
        observe(&self.db, Change::Recipes, move || {
            match self.db.recipe_by_id(id) {
                Ok(row) => row.map(RecipeRow::into_model),
                Err(e) => {
                    warn!("recipe read failed: {e}");
                    None
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    fn recipe(title: &str) -> UserRecipe {
        UserRecipe {
            title: title.into(),
            instructions: "Cook it.".into(),
            ingredients_and_measures: "Things - enough".into(),
            ..UserRecipe::default()
        }
    }

    #[tokio::test]
    async fn create_assigns_ids_and_get_reads_back() {
        let repo = RecipeRepo::new(Arc::new(Database::open_in_memory().unwrap()));

        let id = repo.create(&recipe("Pancakes")).unwrap();
        let stored = repo.get(id).unwrap().unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.title, "Pancakes");

        assert!(repo.get(id + 1).unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_drops_from_the_next_emission_only_for_that_recipe() {
        let repo = RecipeRepo::new(Arc::new(Database::open_in_memory().unwrap()));
        let keep = repo.create(&recipe("Waffles")).unwrap();
        let doomed = repo.create(&recipe("Crepes")).unwrap();

        let all = repo.all();
        futures_util::pin_mut!(all);
        assert_eq!(all.next().await.unwrap().len(), 2);

        repo.delete(doomed).unwrap();

        let remaining = all.next().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, keep);
        assert_eq!(remaining[0].title, "Waffles");
    }

    #[tokio::test]
    async fn watch_goes_none_after_delete() {
        let repo = RecipeRepo::new(Arc::new(Database::open_in_memory().unwrap()));
        let id = repo.create(&recipe("Soup")).unwrap();

        let watched = repo.watch(id);
        futures_util::pin_mut!(watched);
        assert!(watched.next().await.unwrap().is_some());

        repo.delete(id).unwrap();
        assert!(watched.next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_is_visible_to_get() {
        let repo = RecipeRepo::new(Arc::new(Database::open_in_memory().unwrap()));
        let id = repo.create(&recipe("Draft")).unwrap();

        let mut edited = repo.get(id).unwrap().unwrap();
        edited.title = "Final".into();
        edited.portions = "4".into();
        repo.update(&edited).unwrap();

        let stored = repo.get(id).unwrap().unwrap();
        assert_eq!(stored.title, "Final");
        assert_eq!(stored.portions, "4");
    }
}
