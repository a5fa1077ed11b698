pub mod models;
pub mod resource;

pub use models::{Category, Meal, MinimalMeal, UserRecipe};
pub use resource::Resource;
