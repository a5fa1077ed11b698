use larder_client::error::ClientError;
use larder_client::{FilterKind, MealApi};
use larder_types::{Category, Meal, MinimalMeal};

/// The remote recipe service as the repositories see it — one trait,
/// one method per endpoint. [`MealApi`] is the production
/// implementation; tests substitute in-memory stubs. Always used
/// through generics, never as a trait object.
#[allow(async_fn_in_trait)]
pub trait RemoteSource {
    async fn random_meal(&self) -> Result<Vec<MinimalMeal>, ClientError>;
    async fn categories(&self) -> Result<Vec<Category>, ClientError>;
    async fn search_meals(
        &self,
        query: &str,
        page: Option<&str>,
    ) -> Result<Vec<MinimalMeal>, ClientError>;
    async fn meal_by_id(&self, id: &str) -> Result<Meal, ClientError>;
    async fn list_options(&self, kind: FilterKind) -> Result<Vec<String>, ClientError>;
    async fn filter(&self, kind: FilterKind, value: &str) -> Result<Vec<MinimalMeal>, ClientError>;
}

impl RemoteSource for MealApi {
    async fn random_meal(&self) -> Result<Vec<MinimalMeal>, ClientError> {
        MealApi::random_meal(self).await
    }

    async fn categories(&self) -> Result<Vec<Category>, ClientError> {
        MealApi::categories(self).await
    }

    async fn search_meals(
        &self,
        query: &str,
        page: Option<&str>,
    ) -> Result<Vec<MinimalMeal>, ClientError> {
        MealApi::search_meals(self, query, page).await
    }

    async fn meal_by_id(&self, id: &str) -> Result<Meal, ClientError> {
        MealApi::meal_by_id(self, id).await
    }

    async fn list_options(&self, kind: FilterKind) -> Result<Vec<String>, ClientError> {
        MealApi::list_options(self, kind).await
    }

    async fn filter(&self, kind: FilterKind, value: &str) -> Result<Vec<MinimalMeal>, ClientError> {
        MealApi::filter(self, kind, value).await
    }
}
