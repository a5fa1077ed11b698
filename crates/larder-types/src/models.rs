use serde::{Deserialize, Serialize};

/// Full recipe record fetched from the remote API.
///
/// `ingredients` and `measures` are parallel, index-aligned lists;
/// blank ingredient slots are dropped on import, so every entry in
/// `ingredients` is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: String,
    pub name: String,
    pub thumb: String,
    pub category: String,
    pub instructions: String,
    /// Comma-joined tags as the API sends them.
    pub tags: String,
    pub video_url: String,
    pub source_url: String,
    pub ingredients: Vec<String>,
    pub measures: Vec<String>,
    /// True when a copy of this meal exists in the local bookmark table.
    pub bookmarked: bool,
}

impl Meal {
    /// Ingredient/measure pairs in recipe order. A missing measure
    /// renders as an empty string rather than shifting the pairing.
    pub fn ingredient_rows(&self) -> Vec<(String, String)> {
        self.ingredients
            .iter()
            .enumerate()
            .map(|(i, ingredient)| {
                let measure = self.measures.get(i).cloned().unwrap_or_default();
                (ingredient.clone(), measure)
            })
            .collect()
    }
}

/// Lightweight recipe record for list, browse, and search views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimalMeal {
    pub id: String,
    pub name: String,
    pub thumb: String,
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub thumb: String,
    pub description: String,
}

/// A recipe authored by the user, stored only on-device. The id is
/// assigned by the store on insert; image fields hold opaque URI
/// strings handed over by the platform's gallery/camera services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecipe {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    pub camera_image: Option<String>,
    pub portions: String,
    pub prep_time: String,
    pub cook_time: String,
    pub source_url: String,
    pub instructions: String,
    /// Free-text blob; the edit screen does not split these.
    pub ingredients_and_measures: String,
    pub notes: String,
}

impl UserRecipe {
    /// The image to display: the gallery pick wins, the camera shot is
    /// the fallback.
    pub fn display_image(&self) -> Option<&str> {
        self.image.as_deref().or(self.camera_image.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingredient_rows_pair_by_index() {
        let meal = Meal {
            ingredients: vec!["Beef".into(), "Onion".into()],
            measures: vec!["200g".into(), "1".into()],
            ..Meal::default()
        };

        assert_eq!(
            meal.ingredient_rows(),
            vec![
                ("Beef".to_string(), "200g".to_string()),
                ("Onion".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn missing_measure_becomes_empty() {
        let meal = Meal {
            ingredients: vec!["Salt".into(), "Pepper".into()],
            measures: vec!["Pinch".into()],
            ..Meal::default()
        };

        let rows = meal.ingredient_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], ("Pepper".to_string(), String::new()));
    }

    #[test]
    fn display_image_prefers_gallery() {
        let mut recipe = UserRecipe {
            image: Some("content://gallery/1".into()),
            camera_image: Some("file://cam/2.jpg".into()),
            ..UserRecipe::default()
        };
        assert_eq!(recipe.display_image(), Some("content://gallery/1"));

        recipe.image = None;
        assert_eq!(recipe.display_image(), Some("file://cam/2.jpg"));

        recipe.camera_image = None;
        assert_eq!(recipe.display_image(), None);
    }
}
