//! Database row types — these map directly to SQLite rows and stay
//! distinct from the larder-types domain models so the storage layer
//! can evolve its own schema.

use larder_types::{Category, Meal, MinimalMeal, UserRecipe};

pub struct MinimalMealRow {
    pub id: String,
    pub name: String,
    pub thumb: String,
    pub category: String,
}

impl MinimalMealRow {
    pub fn from_model(meal: &MinimalMeal) -> Self {
        Self {
            id: meal.id.clone(),
            name: meal.name.clone(),
            thumb: meal.thumb.clone(),
            category: meal.category.clone(),
        }
    }

    pub fn into_model(self) -> MinimalMeal {
        MinimalMeal {
            id: self.id,
            name: self.name,
            thumb: self.thumb,
            category: self.category,
        }
    }
}

pub struct CategoryRow {
    pub id: String,
    pub name: String,
    pub thumb: String,
    pub description: String,
}

impl CategoryRow {
    pub fn from_model(category: &Category) -> Self {
        Self {
            id: category.id.clone(),
            name: category.name.clone(),
            thumb: category.thumb.clone(),
            description: category.description.clone(),
        }
    }

    pub fn into_model(self) -> Category {
        Category {
            id: self.id,
            name: self.name,
            thumb: self.thumb,
            description: self.description,
        }
    }
}

/// A full meal duplicated into local storage so it stays viewable
/// offline. The row's existence is the bookmark flag; ingredient and
/// measure lists are stored as JSON text columns.
pub struct BookmarkRow {
    pub id: String,
    pub name: String,
    pub thumb: String,
    pub category: String,
    pub instructions: String,
    pub tags: String,
    pub video_url: String,
    pub source_url: String,
    pub ingredients: String,
    pub measures: String,
    pub saved_at: String,
}

impl BookmarkRow {
    pub fn from_meal(meal: &Meal) -> Self {
        Self {
            id: meal.id.clone(),
            name: meal.name.clone(),
            thumb: meal.thumb.clone(),
            category: meal.category.clone(),
            instructions: meal.instructions.clone(),
            tags: meal.tags.clone(),
            video_url: meal.video_url.clone(),
            source_url: meal.source_url.clone(),
            ingredients: encode_list(&meal.ingredients),
            measures: encode_list(&meal.measures),
            saved_at: String::new(),
        }
    }

    /// Rebuild the domain meal. A row read from the bookmark table is a
    /// bookmark, so `bookmarked` is always true here.
    pub fn into_meal(self) -> Meal {
        Meal {
            id: self.id,
            name: self.name,
            thumb: self.thumb,
            category: self.category,
            instructions: self.instructions,
            tags: self.tags,
            video_url: self.video_url,
            source_url: self.source_url,
            ingredients: decode_list(&self.ingredients),
            measures: decode_list(&self.measures),
            bookmarked: true,
        }
    }
}

pub struct RecipeRow {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    pub camera_image: Option<String>,
    pub portions: String,
    pub prep_time: String,
    pub cook_time: String,
    pub source_url: String,
    pub instructions: String,
    pub ingredients_and_measures: String,
    pub notes: String,
    pub created_at: String,
}

impl RecipeRow {
    pub fn from_model(recipe: &UserRecipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title.clone(),
            image: recipe.image.clone(),
            camera_image: recipe.camera_image.clone(),
            portions: recipe.portions.clone(),
            prep_time: recipe.prep_time.clone(),
            cook_time: recipe.cook_time.clone(),
            source_url: recipe.source_url.clone(),
            instructions: recipe.instructions.clone(),
            ingredients_and_measures: recipe.ingredients_and_measures.clone(),
            notes: recipe.notes.clone(),
            created_at: String::new(),
        }
    }

    pub fn into_model(self) -> UserRecipe {
        UserRecipe {
            id: self.id,
            title: self.title,
            image: self.image,
            camera_image: self.camera_image,
            portions: self.portions,
            prep_time: self.prep_time,
            cook_time: self.cook_time,
            source_url: self.source_url,
            instructions: self.instructions,
            ingredients_and_measures: self.ingredients_and_measures,
            notes: self.notes,
        }
    }
}

fn encode_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

/// Lenient on the way out: a column that fails to parse (hand-edited
/// db, older build) reads as an empty list instead of an error.
fn decode_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_columns_survive_commas() {
        let encoded = encode_list(&["Onion, chopped".to_string(), "Salt".to_string()]);
        assert_eq!(decode_list(&encoded), vec!["Onion, chopped", "Salt"]);
    }

    #[test]
    fn garbage_list_column_reads_as_empty() {
        assert!(decode_list("Onion,Salt").is_empty());
        assert!(decode_list("").is_empty());
    }

    #[test]
    fn bookmark_row_round_trips_a_meal() {
        let meal = Meal {
            id: "52874".into(),
            name: "Beef and Mustard Pie".into(),
            ingredients: vec!["Beef".into(), "Onion".into()],
            measures: vec!["1kg".into(), "2".into()],
            ..Meal::default()
        };

        let restored = BookmarkRow::from_meal(&meal).into_meal();
        assert_eq!(restored.id, meal.id);
        assert_eq!(restored.ingredients, meal.ingredients);
        assert_eq!(restored.measures, meal.measures);
        assert!(restored.bookmarked);
    }
}
