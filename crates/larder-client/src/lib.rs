pub mod dto;
pub mod error;

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::dto::{
    CategoriesEnvelope, FilterMealDto, ListNameDto, MealDto, MealsEnvelope, MinimalMealDto,
};
use crate::error::ClientError;
use larder_types::{Category, Meal, MinimalMeal};

pub const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1/";

/// Fixed connect/total timeout, matching the upstream API's advertised
/// latency envelope. There is no per-call override.
const TIMEOUT: Duration = Duration::from_secs(15);

/// Which attribute a list or filter request keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Category,
    Area,
    Ingredient,
}

impl FilterKind {
    fn param(self) -> &'static str {
        match self {
            FilterKind::Category => "c",
            FilterKind::Area => "a",
            FilterKind::Ingredient => "i",
        }
    }
}

/// Client for TheMealDB-style recipe API. Thin and stateless: every
/// method is a single GET, decoded leniently (see [`dto`]), with no
/// caching and no retries. Cloning shares the underlying connection
/// pool.
#[derive(Clone)]
pub struct MealApi {
    http: reqwest::Client,
    base_url: String,
}

impl MealApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .connect_timeout(TIMEOUT)
            .timeout(TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One meal picked by the server at random.
    pub async fn random_meal(&self) -> Result<Vec<MinimalMeal>, ClientError> {
        let envelope: MealsEnvelope<MinimalMealDto> = self.get_json("random.php", &[]).await?;
        Ok(envelope
            .into_items()
            .into_iter()
            .map(MinimalMealDto::into_model)
            .collect())
    }

    pub async fn categories(&self) -> Result<Vec<Category>, ClientError> {
        let envelope: CategoriesEnvelope = self.get_json("categories.php", &[]).await?;
        Ok(envelope
            .into_items()
            .into_iter()
            .map(dto::CategoryDto::into_model)
            .collect())
    }

    /// Name search. `page` is the forward-paging cursor (the last seen
    /// meal id); `None` asks for the first page.
    pub async fn search_meals(
        &self,
        query: &str,
        page: Option<&str>,
    ) -> Result<Vec<MinimalMeal>, ClientError> {
        let mut params = vec![("s", query)];
        if let Some(page) = page {
            params.push(("page", page));
        }

        let envelope: MealsEnvelope<MinimalMealDto> = self.get_json("search.php", &params).await?;
        Ok(envelope
            .into_items()
            .into_iter()
            .map(MinimalMealDto::into_model)
            .collect())
    }

    /// Full meal record by id. The API answers `{"meals": null}` for an
    /// unknown id, which surfaces as [`ClientError::NotFound`].
    pub async fn meal_by_id(&self, id: &str) -> Result<Meal, ClientError> {
        let envelope: MealsEnvelope<MealDto> = self.get_json("lookup.php", &[("i", id)]).await?;
        envelope
            .into_items()
            .into_iter()
            .next()
            .map(MealDto::into_meal)
            .ok_or_else(|| ClientError::NotFound(id.to_string()))
    }

    /// All known names for one attribute kind (category/area/ingredient).
    pub async fn list_options(&self, kind: FilterKind) -> Result<Vec<String>, ClientError> {
        let envelope: MealsEnvelope<ListNameDto> =
            self.get_json("list.php", &[(kind.param(), "list")]).await?;
        Ok(envelope
            .into_items()
            .into_iter()
            .map(ListNameDto::into_name)
            .filter(|name| !name.is_empty())
            .collect())
    }

    /// Meals matching one attribute value. Results are minimal records
    /// with no category of their own.
    pub async fn filter(
        &self,
        kind: FilterKind,
        value: &str,
    ) -> Result<Vec<MinimalMeal>, ClientError> {
        let envelope: MealsEnvelope<FilterMealDto> =
            self.get_json("filter.php", &[(kind.param(), value)]).await?;
        Ok(envelope
            .into_items()
            .into_iter()
            .map(FilterMealDto::into_model)
            .collect())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, params);

        let response = self.http.get(&url).query(params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status,
                url: response.url().to_string(),
            });
        }

        Ok(response.json::<T>().await?)
    }
}
