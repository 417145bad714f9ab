use crate::{
    AccountService, AuthResponse, FoodCollection, FoodItem, FoodRecorder, FoodState,
    FreshnessClassifier, NewFoodRecord, ProfileUpdate, ProviderError, RemoteFoodRecord,
    UserProfile,
};

#[derive(Debug, Default)]
pub struct NoopProvider;

#[async_trait::async_trait]
impl FoodCollection for NoopProvider {
    async fn list_food(&self) -> Result<Vec<RemoteFoodRecord>, ProviderError> {
        Ok(vec![])
    }

    fn base_url(&self) -> &str {
        ""
    }
}

#[async_trait::async_trait]
impl FoodRecorder for NoopProvider {
    async fn add_food(&self, _record: NewFoodRecord) -> Result<FoodItem, ProviderError> {
        Err(ProviderError::NotImplemented)
    }

    async fn delete_food(&self, _unique_id: &str) -> Result<(), ProviderError> {
        Err(ProviderError::NotImplemented)
    }
}

#[async_trait::async_trait]
impl FreshnessClassifier for NoopProvider {
    async fn classify(&self, _image: &[u8]) -> Result<FoodState, ProviderError> {
        Err(ProviderError::NotImplemented)
    }
}

#[async_trait::async_trait]
impl AccountService for NoopProvider {
    async fn signup(&self, _: &str, _: &str, _: &str) -> Result<AuthResponse, ProviderError> {
        Err(ProviderError::NotImplemented)
    }

    async fn login(&self, _: &str, _: &str) -> Result<AuthResponse, ProviderError> {
        Err(ProviderError::NotImplemented)
    }

    async fn user(&self, _: &str) -> Result<UserProfile, ProviderError> {
        Err(ProviderError::NotImplemented)
    }

    async fn update_user(&self, _: &str, _: ProfileUpdate) -> Result<(), ProviderError> {
        Err(ProviderError::NotImplemented)
    }

    async fn update_picture(&self, _: &str, _: Vec<u8>, _: &str) -> Result<(), ProviderError> {
        Err(ProviderError::NotImplemented)
    }

    async fn fetch_picture(&self, _: &str) -> Result<Vec<u8>, ProviderError> {
        Err(ProviderError::NotImplemented)
    }
}
