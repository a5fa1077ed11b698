use anyhow::Result;
use chrono::Utc;
use rusqlite::{Connection, params};

use crate::models::{BookmarkRow, CategoryRow, MinimalMealRow, RecipeRow};
use crate::{Change, Database};

impl Database {
    // -- Search cache --

    /// Swap the whole cache for a fresh first page. Delete and insert
    /// run in one transaction, so concurrent readers never observe a
    /// half-replaced table.
    pub fn replace_search_cache(&self, rows: &[MinimalMealRow]) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM search_cache", [])?;
            insert_search_rows(&tx, rows)?;
            tx.commit()?;
            Ok(())
        })?;
        self.notify(Change::SearchCache);
        Ok(())
    }

    /// Append a follow-up page. Upserts keep the original rowid, so
    /// insertion order (and with it page order) is stable.
    pub fn append_search_cache(&self, rows: &[MinimalMealRow]) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            insert_search_rows(&tx, rows)?;
            tx.commit()?;
            Ok(())
        })?;
        self.notify(Change::SearchCache);
        Ok(())
    }

    pub fn search_cache_page(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<MinimalMealRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, thumb, category FROM search_cache
                 WHERE name LIKE '%' || ?1 || '%'
                 ORDER BY rowid
                 LIMIT ?2 OFFSET ?3",
            )?;

            let rows = stmt
                .query_map(params![query, limit as i64, offset as i64], |row| {
                    Ok(MinimalMealRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        thumb: row.get(2)?,
                        category: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn clear_search_cache(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM search_cache", [])?;
            Ok(())
        })?;
        self.notify(Change::SearchCache);
        Ok(())
    }

    // -- Categories --

    pub fn upsert_categories(&self, rows: &[CategoryRow]) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO categories (id, name, thumb, description)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(id) DO UPDATE SET
                         name = excluded.name,
                         thumb = excluded.thumb,
                         description = excluded.description",
                )?;
                for row in rows {
                    stmt.execute(params![row.id, row.name, row.thumb, row.description])?;
                }
            }
            tx.commit()?;
            Ok(())
        })?;
        self.notify(Change::Categories);
        Ok(())
    }

    pub fn categories(&self) -> Result<Vec<CategoryRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, name, thumb, description FROM categories ORDER BY rowid")?;

            let rows = stmt
                .query_map([], |row| {
                    Ok(CategoryRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        thumb: row.get(2)?,
                        description: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    // -- Bookmarks --

    pub fn upsert_bookmark(&self, row: &BookmarkRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO bookmarks
                     (id, name, thumb, category, instructions, tags,
                      video_url, source_url, ingredients, measures, saved_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                 ON CONFLICT(id) DO UPDATE SET
                     name = excluded.name,
                     thumb = excluded.thumb,
                     category = excluded.category,
                     instructions = excluded.instructions,
                     tags = excluded.tags,
                     video_url = excluded.video_url,
                     source_url = excluded.source_url,
                     ingredients = excluded.ingredients,
                     measures = excluded.measures",
                params![
                    row.id,
                    row.name,
                    row.thumb,
                    row.category,
                    row.instructions,
                    row.tags,
                    row.video_url,
                    row.source_url,
                    row.ingredients,
                    row.measures,
                    Utc::now().to_rfc3339(),
                ],
            )?;
            Ok(())
        })?;
        self.notify(Change::Bookmarks);
        Ok(())
    }

    pub fn delete_bookmark(&self, id: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM bookmarks WHERE id = ?1", [id])?;
            Ok(())
        })?;
        self.notify(Change::Bookmarks);
        Ok(())
    }

    /// Newest bookmarks first.
    pub fn bookmarks(&self) -> Result<Vec<BookmarkRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, thumb, category, instructions, tags,
                        video_url, source_url, ingredients, measures, saved_at
                 FROM bookmarks
                 ORDER BY saved_at DESC",
            )?;

            let rows = stmt
                .query_map([], read_bookmark_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn bookmark_by_id(&self, id: &str) -> Result<Option<BookmarkRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, thumb, category, instructions, tags,
                        video_url, source_url, ingredients, measures, saved_at
                 FROM bookmarks
                 WHERE id = ?1",
            )?;

            let row = stmt.query_row([id], read_bookmark_row).optional()?;
            Ok(row)
        })
    }

    /// A bookmark row existing IS the flag; nothing else stores it.
    pub fn is_bookmarked(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let exists: i64 = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM bookmarks WHERE id = ?1)",
                [id],
                |row| row.get(0),
            )?;
            Ok(exists != 0)
        })
    }

    pub fn clear_bookmarks(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM bookmarks", [])?;
            Ok(())
        })?;
        self.notify(Change::Bookmarks);
        Ok(())
    }

    // -- Recipes --

    /// Insert a user recipe and return its store-assigned id. The id on
    /// the passed row is ignored.
    pub fn insert_recipe(&self, row: &RecipeRow) -> Result<i64> {
        let id = self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO recipes
                     (title, image, camera_image, portions, prep_time, cook_time,
                      source_url, instructions, ingredients_and_measures, notes, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    row.title,
                    row.image,
                    row.camera_image,
                    row.portions,
                    row.prep_time,
                    row.cook_time,
                    row.source_url,
                    row.instructions,
                    row.ingredients_and_measures,
                    row.notes,
                    Utc::now().to_rfc3339(),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })?;
        self.notify(Change::Recipes);
        Ok(id)
    }

    /// Newest recipes first.
    pub fn recipes(&self) -> Result<Vec<RecipeRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, image, camera_image, portions, prep_time, cook_time,
                        source_url, instructions, ingredients_and_measures, notes, created_at
                 FROM recipes
                 ORDER BY created_at DESC, id DESC",
            )?;

            let rows = stmt
                .query_map([], read_recipe_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn recipe_by_id(&self, id: i64) -> Result<Option<RecipeRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, image, camera_image, portions, prep_time, cook_time,
                        source_url, instructions, ingredients_and_measures, notes, created_at
                 FROM recipes
                 WHERE id = ?1",
            )?;

            let row = stmt.query_row([id], read_recipe_row).optional()?;
            Ok(row)
        })
    }

    /// Last write wins; `created_at` keeps its original value.
    pub fn update_recipe(&self, row: &RecipeRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE recipes SET
                     title = ?2,
                     image = ?3,
                     camera_image = ?4,
                     portions = ?5,
                     prep_time = ?6,
                     cook_time = ?7,
                     source_url = ?8,
                     instructions = ?9,
                     ingredients_and_measures = ?10,
                     notes = ?11
                 WHERE id = ?1",
                params![
                    row.id,
                    row.title,
                    row.image,
                    row.camera_image,
                    row.portions,
                    row.prep_time,
                    row.cook_time,
                    row.source_url,
                    row.instructions,
                    row.ingredients_and_measures,
                    row.notes,
                ],
            )?;
            Ok(())
        })?;
        self.notify(Change::Recipes);
        Ok(())
    }

    pub fn delete_recipe(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM recipes WHERE id = ?1", [id])?;
            Ok(())
        })?;
        self.notify(Change::Recipes);
        Ok(())
    }
}

fn insert_search_rows(conn: &Connection, rows: &[MinimalMealRow]) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO search_cache (id, name, thumb, category)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
             name = excluded.name,
             thumb = excluded.thumb,
             category = excluded.category",
    )?;
    for row in rows {
        stmt.execute(params![row.id, row.name, row.thumb, row.category])?;
    }
    Ok(())
}

fn read_bookmark_row(row: &rusqlite::Row<'_>) -> std::result::Result<BookmarkRow, rusqlite::Error> {
    Ok(BookmarkRow {
        id: row.get(0)?,
        name: row.get(1)?,
        thumb: row.get(2)?,
        category: row.get(3)?,
        instructions: row.get(4)?,
        tags: row.get(5)?,
        video_url: row.get(6)?,
        source_url: row.get(7)?,
        ingredients: row.get(8)?,
        measures: row.get(9)?,
        saved_at: row.get(10)?,
    })
}

fn read_recipe_row(row: &rusqlite::Row<'_>) -> std::result::Result<RecipeRow, rusqlite::Error> {
    Ok(RecipeRow {
        id: row.get(0)?,
        title: row.get(1)?,
        image: row.get(2)?,
        camera_image: row.get(3)?,
        portions: row.get(4)?,
        prep_time: row.get(5)?,
        cook_time: row.get(6)?,
        source_url: row.get(7)?,
        instructions: row.get(8)?,
        ingredients_and_measures: row.get(9)?,
        notes: row.get(10)?,
        created_at: row.get(11)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> std::result::Result<Option<T>, rusqlite::Error>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> std::result::Result<Option<T>, rusqlite::Error> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_types::{Meal, MinimalMeal, UserRecipe};

    fn minimal(id: &str, name: &str) -> MinimalMealRow {
        MinimalMealRow::from_model(&MinimalMeal {
            id: id.into(),
            name: name.into(),
            thumb: format!("https://example.com/{id}.jpg"),
            category: "Beef".into(),
        })
    }

    #[test]
    fn replace_clears_stale_rows() {
        let db = Database::open_in_memory().unwrap();

        db.append_search_cache(&[minimal("1", "Old pie"), minimal("2", "Old stew")])
            .unwrap();
        db.replace_search_cache(&[minimal("3", "Fresh pie")]).unwrap();

        let names: Vec<String> = db
            .search_cache_page("", 50, 0)
            .unwrap()
            .into_iter()
            .map(|row| row.name)
            .collect();
        assert_eq!(names, vec!["Fresh pie"]);
    }

    #[test]
    fn search_page_filters_and_paginates() {
        let db = Database::open_in_memory().unwrap();
        db.append_search_cache(&[
            minimal("1", "Beef pie"),
            minimal("2", "Chicken soup"),
            minimal("3", "beef stew"),
            minimal("4", "Roast beef"),
        ])
        .unwrap();

        let page = db.search_cache_page("beef", 2, 0).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].name, "Beef pie");

        let page = db.search_cache_page("beef", 2, 2).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "Roast beef");
    }

    #[test]
    fn upsert_keeps_insertion_order() {
        let db = Database::open_in_memory().unwrap();
        db.append_search_cache(&[minimal("1", "First"), minimal("2", "Second")])
            .unwrap();
        // Same id again with a new name must update in place, not move.
        db.append_search_cache(&[minimal("1", "First updated")]).unwrap();

        let names: Vec<String> = db
            .search_cache_page("", 10, 0)
            .unwrap()
            .into_iter()
            .map(|row| row.name)
            .collect();
        assert_eq!(names, vec!["First updated", "Second"]);
    }

    #[test]
    fn bookmark_flag_follows_row_existence() {
        let db = Database::open_in_memory().unwrap();
        let meal = Meal {
            id: "52874".into(),
            name: "Beef and Mustard Pie".into(),
            ..Meal::default()
        };

        assert!(!db.is_bookmarked("52874").unwrap());

        db.upsert_bookmark(&BookmarkRow::from_meal(&meal)).unwrap();
        assert!(db.is_bookmarked("52874").unwrap());

        db.delete_bookmark("52874").unwrap();
        assert!(!db.is_bookmarked("52874").unwrap());
    }

    #[test]
    fn bookmark_round_trips_through_the_table() {
        let db = Database::open_in_memory().unwrap();
        let meal = Meal {
            id: "52959".into(),
            name: "Baked salmon".into(),
            ingredients: vec!["Salmon".into(), "Fennel, sliced".into()],
            measures: vec!["2 fillets".into(), "1".into()],
            ..Meal::default()
        };

        db.upsert_bookmark(&BookmarkRow::from_meal(&meal)).unwrap();

        let restored = db.bookmark_by_id("52959").unwrap().unwrap().into_meal();
        assert_eq!(restored.name, "Baked salmon");
        assert_eq!(restored.ingredients, meal.ingredients);
        assert!(restored.bookmarked);

        assert!(db.bookmark_by_id("missing").unwrap().is_none());
    }

    #[test]
    fn clear_bookmarks_removes_everything() {
        let db = Database::open_in_memory().unwrap();
        for id in ["1", "2", "3"] {
            let meal = Meal {
                id: id.into(),
                ..Meal::default()
            };
            db.upsert_bookmark(&BookmarkRow::from_meal(&meal)).unwrap();
        }

        db.clear_bookmarks().unwrap();
        assert!(db.bookmarks().unwrap().is_empty());
    }

    #[test]
    fn recipe_ids_are_assigned_by_the_store() {
        let db = Database::open_in_memory().unwrap();
        let recipe = UserRecipe {
            title: "Pancakes".into(),
            instructions: "Mix and fry.".into(),
            ..UserRecipe::default()
        };

        let first = db.insert_recipe(&RecipeRow::from_model(&recipe)).unwrap();
        let second = db.insert_recipe(&RecipeRow::from_model(&recipe)).unwrap();
        assert!(second > first);
    }

    #[test]
    fn deleting_a_recipe_leaves_the_others() {
        let db = Database::open_in_memory().unwrap();
        let mut ids = Vec::new();
        for title in ["Pancakes", "Waffles", "Crepes"] {
            let recipe = UserRecipe {
                title: title.into(),
                ..UserRecipe::default()
            };
            ids.push(db.insert_recipe(&RecipeRow::from_model(&recipe)).unwrap());
        }

        db.delete_recipe(ids[1]).unwrap();

        let titles: Vec<String> = db
            .recipes()
            .unwrap()
            .into_iter()
            .map(|row| row.title)
            .collect();
        assert_eq!(titles.len(), 2);
        assert!(titles.contains(&"Pancakes".to_string()));
        assert!(titles.contains(&"Crepes".to_string()));
        assert!(!titles.contains(&"Waffles".to_string()));
    }

    #[test]
    fn update_recipe_overwrites_fields() {
        let db = Database::open_in_memory().unwrap();
        let id = db
            .insert_recipe(&RecipeRow::from_model(&UserRecipe {
                title: "Draft".into(),
                ..UserRecipe::default()
            }))
            .unwrap();

        let mut edited = db.recipe_by_id(id).unwrap().unwrap().into_model();
        edited.title = "Final".into();
        edited.notes = "Double the sugar.".into();
        db.update_recipe(&RecipeRow::from_model(&edited)).unwrap();

        let stored = db.recipe_by_id(id).unwrap().unwrap().into_model();
        assert_eq!(stored.title, "Final");
        assert_eq!(stored.notes, "Double the sugar.");
    }

    #[test]
    fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("larder.db");

        {
            let db = Database::open(&path).unwrap();
            db.insert_recipe(&RecipeRow::from_model(&UserRecipe {
                title: "Pancakes".into(),
                ..UserRecipe::default()
            }))
            .unwrap();
        }

        let db = Database::open(&path).unwrap();
        let titles: Vec<String> = db
            .recipes()
            .unwrap()
            .into_iter()
            .map(|row| row.title)
            .collect();
        assert_eq!(titles, vec!["Pancakes"]);
    }

    #[test]
    fn categories_upsert_and_read_back() {
        let db = Database::open_in_memory().unwrap();
        let rows = vec![CategoryRow {
            id: "1".into(),
            name: "Beef".into(),
            thumb: "https://example.com/beef.png".into(),
            description: "Meat from cattle.".into(),
        }];

        db.upsert_categories(&rows).unwrap();
        db.upsert_categories(&rows).unwrap(); // idempotent

        let stored = db.categories().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "Beef");
    }

    #[test]
    fn writes_publish_table_changes() {
        let db = Database::open_in_memory().unwrap();
        let mut changes = db.subscribe();

        db.insert_recipe(&RecipeRow::from_model(&UserRecipe::default()))
            .unwrap();
        assert_eq!(changes.try_recv().unwrap(), Change::Recipes);

        db.clear_search_cache().unwrap();
        assert_eq!(changes.try_recv().unwrap(), Change::SearchCache);
    }
}
