use larder_client::FilterKind;
use larder_client::error::ClientError;
use larder_types::MinimalMeal;

use crate::remote::RemoteSource;

/// Attribute-filtered browsing. Always straight to the network — these
/// result sets are cheap and were never cached by the product.
pub struct FilterRepo<A> {
    api: A,
}

impl<A: RemoteSource> FilterRepo<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub async fn by_category(&self, category: &str) -> Result<Vec<MinimalMeal>, ClientError> {
        self.api.filter(FilterKind::Category, category).await
    }

    pub async fn by_area(&self, area: &str) -> Result<Vec<MinimalMeal>, ClientError> {
        self.api.filter(FilterKind::Area, area).await
    }

    pub async fn by_ingredient(&self, ingredient: &str) -> Result<Vec<MinimalMeal>, ClientError> {
        self.api.filter(FilterKind::Ingredient, ingredient).await
    }

    /// All known names for one attribute kind, for filter pickers.
    pub async fn options(&self, kind: FilterKind) -> Result<Vec<String>, ClientError> {
        self.api.list_options(kind).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_types::{Category, Meal};
    use std::sync::Mutex;

    struct RecordingStub {
        requests: Mutex<Vec<(FilterKind, String)>>,
    }

    impl RecordingStub {
        fn new() -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl RemoteSource for RecordingStub {
        async fn filter(
            &self,
            kind: FilterKind,
            value: &str,
        ) -> Result<Vec<MinimalMeal>, ClientError> {
            self.requests.lock().unwrap().push((kind, value.to_string()));
            Ok(vec![MinimalMeal {
                id: "1".into(),
                name: format!("Something {value}"),
                ..MinimalMeal::default()
            }])
        }

        async fn list_options(&self, kind: FilterKind) -> Result<Vec<String>, ClientError> {
            self.requests.lock().unwrap().push((kind, "list".into()));
            Ok(vec!["Beef".into(), "Dessert".into()])
        }

        async fn random_meal(&self) -> Result<Vec<MinimalMeal>, ClientError> {
            unimplemented!()
        }
        async fn categories(&self) -> Result<Vec<Category>, ClientError> {
            unimplemented!()
        }
        async fn search_meals(
            &self,
            _query: &str,
            _page: Option<&str>,
        ) -> Result<Vec<MinimalMeal>, ClientError> {
            unimplemented!()
        }
        async fn meal_by_id(&self, _id: &str) -> Result<Meal, ClientError> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn each_helper_hits_the_matching_kind() {
        let repo = FilterRepo::new(RecordingStub::new());

        repo.by_category("Seafood").await.unwrap();
        repo.by_area("Canadian").await.unwrap();
        repo.by_ingredient("Chicken").await.unwrap();
        repo.options(FilterKind::Category).await.unwrap();

        let requests = repo.api.requests.lock().unwrap();
        assert_eq!(
            requests.as_slice(),
            &[
                (FilterKind::Category, "Seafood".to_string()),
                (FilterKind::Area, "Canadian".to_string()),
                (FilterKind::Ingredient, "Chicken".to_string()),
                (FilterKind::Category, "list".to_string()),
            ]
        );
    }
}
