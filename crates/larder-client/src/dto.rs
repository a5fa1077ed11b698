//! Wire types for TheMealDB-style JSON API.
//!
//! Decoding is deliberately lenient: every string field is optional and
//! collapses to `""`, unknown fields are ignored, and a `"meals": null`
//! body (the API's way of saying "no results") becomes an empty list.

use std::collections::HashMap;

use larder_types::{Category, Meal, MinimalMeal};
use serde::Deserialize;

/// Most endpoints wrap their payload in `{"meals": [...]}`.
#[derive(Debug, Deserialize)]
pub struct MealsEnvelope<T> {
    #[serde(default)]
    pub meals: Option<Vec<T>>,
}

impl<T> MealsEnvelope<T> {
    pub fn into_items(self) -> Vec<T> {
        self.meals.unwrap_or_default()
    }
}

/// `categories.php` wraps under `"categories"` instead.
#[derive(Debug, Deserialize)]
pub struct CategoriesEnvelope {
    #[serde(default)]
    pub categories: Option<Vec<CategoryDto>>,
}

impl CategoriesEnvelope {
    pub fn into_items(self) -> Vec<CategoryDto> {
        self.categories.unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MinimalMealDto {
    #[serde(rename = "idMeal")]
    pub id_meal: Option<String>,
    #[serde(rename = "strMeal")]
    pub name: Option<String>,
    #[serde(rename = "strMealThumb")]
    pub thumb: Option<String>,
    #[serde(rename = "strCategory")]
    pub category: Option<String>,
}

impl MinimalMealDto {
    pub fn into_model(self) -> MinimalMeal {
        MinimalMeal {
            id: self.id_meal.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            thumb: self.thumb.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
        }
    }
}

/// The API spreads ingredients over twenty numbered columns
/// (`strIngredient1..20` paired with `strMeasure1..20`).
const NUMBERED_SLOTS: usize = 20;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MealDto {
    #[serde(rename = "idMeal")]
    pub id_meal: Option<String>,
    #[serde(rename = "strMeal")]
    pub name: Option<String>,
    #[serde(rename = "strMealThumb")]
    pub thumb: Option<String>,
    #[serde(rename = "strCategory")]
    pub category: Option<String>,
    #[serde(rename = "strInstructions")]
    pub instructions: Option<String>,
    #[serde(rename = "strTags")]
    pub tags: Option<String>,
    #[serde(rename = "strYoutube")]
    pub youtube: Option<String>,
    #[serde(rename = "strSource")]
    pub source: Option<String>,
    /// The numbered ingredient/measure columns land here.
    #[serde(flatten)]
    pub numbered: HashMap<String, serde_json::Value>,
}

impl MealDto {
    /// Collapse the numbered columns into two parallel, index-aligned
    /// lists. A slot whose ingredient is blank is dropped entirely; a
    /// blank measure next to a present ingredient becomes `""` so the
    /// pairing never shifts.
    pub fn ingredient_lists(&self) -> (Vec<String>, Vec<String>) {
        let mut ingredients = Vec::new();
        let mut measures = Vec::new();

        for slot in 1..=NUMBERED_SLOTS {
            let ingredient = self.numbered_field("strIngredient", slot);
            if ingredient.is_empty() {
                continue;
            }
            measures.push(self.numbered_field("strMeasure", slot));
            ingredients.push(ingredient);
        }

        (ingredients, measures)
    }

    fn numbered_field(&self, prefix: &str, slot: usize) -> String {
        self.numbered
            .get(&format!("{prefix}{slot}"))
            .and_then(|value| value.as_str())
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    }

    pub fn into_meal(self) -> Meal {
        let (ingredients, measures) = self.ingredient_lists();

        Meal {
            id: self.id_meal.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            thumb: self.thumb.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            instructions: self.instructions.unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
            video_url: self.youtube.unwrap_or_default(),
            source_url: self.source.unwrap_or_default(),
            ingredients,
            measures,
            bookmarked: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CategoryDto {
    #[serde(rename = "idCategory")]
    pub id_category: Option<String>,
    #[serde(rename = "strCategory")]
    pub name: Option<String>,
    #[serde(rename = "strCategoryThumb")]
    pub thumb: Option<String>,
    #[serde(rename = "strCategoryDescription")]
    pub description: Option<String>,
}

impl CategoryDto {
    pub fn into_model(self) -> Category {
        Category {
            id: self.id_category.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            thumb: self.thumb.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
        }
    }
}

/// `filter.php` results carry only the minimal trio, no category.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FilterMealDto {
    #[serde(rename = "idMeal")]
    pub id_meal: Option<String>,
    #[serde(rename = "strMeal")]
    pub name: Option<String>,
    #[serde(rename = "strMealThumb")]
    pub thumb: Option<String>,
}

impl FilterMealDto {
    pub fn into_model(self) -> MinimalMeal {
        MinimalMeal {
            id: self.id_meal.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            thumb: self.thumb.unwrap_or_default(),
            category: String::new(),
        }
    }
}

/// `list.php?c|a|i=list` answers one name per row, keyed by kind.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListNameDto {
    #[serde(rename = "strCategory")]
    pub category: Option<String>,
    #[serde(rename = "strArea")]
    pub area: Option<String>,
    #[serde(rename = "strIngredient")]
    pub ingredient: Option<String>,
}

impl ListNameDto {
    pub fn into_name(self) -> String {
        [self.category, self.area, self.ingredient]
            .into_iter()
            .flatten()
            .find(|name| !name.is_empty())
            .unwrap_or_default()
    }
}
