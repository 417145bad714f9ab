use providers::{AccountService, AuthResponse, ProfileUpdate, ProviderError, UserProfile};
use sqlx::SqlitePool;
use std::sync::Arc;
use storage::USER_TOKEN_KEY;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("all fields are required")]
    MissingFields,
    #[error("user not authenticated")]
    NotAuthenticated,
    #[error("invalid date format, use YYYY-MM-DD")]
    InvalidDate,
    #[error("invalid response: missing user id")]
    InvalidResponse,
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Signup, login and profile calls with the session token kept in local settings.
pub struct Accounts {
    service: Arc<dyn AccountService>,
    pool: SqlitePool,
}

impl Accounts {
    pub fn new(service: Arc<dyn AccountService>, pool: SqlitePool) -> Self {
        Self { service, pool }
    }

    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<String, AccountError> {
        require(&[name, email, password])?;
        let resp = self.service.signup(name.trim(), email.trim(), password).await?;
        self.store_token(resp).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String, AccountError> {
        require(&[email, password])?;
        let resp = self.service.login(email.trim(), password).await?;
        self.store_token(resp).await
    }

    pub async fn logout(&self) -> Result<(), AccountError> {
        storage::delete_setting(&self.pool, USER_TOKEN_KEY).await?;
        Ok(())
    }

    pub async fn token(&self) -> Result<Option<String>, AccountError> {
        Ok(storage::get_setting(&self.pool, USER_TOKEN_KEY).await?)
    }

    pub async fn profile(&self) -> Result<UserProfile, AccountError> {
        let token = self.require_token().await?;
        Ok(self.service.user(&token).await?)
    }

    pub async fn update_profession(&self, profession: &str) -> Result<(), AccountError> {
        require(&[profession])?;
        self.update(ProfileUpdate::Profession(profession.trim().to_string()))
            .await
    }

    pub async fn update_username(&self, username: &str) -> Result<(), AccountError> {
        require(&[username])?;
        self.update(ProfileUpdate::Username(username.trim().to_string()))
            .await
    }

    pub async fn update_date_of_birth(&self, date: &str) -> Result<(), AccountError> {
        let parsed = chrono::NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| AccountError::InvalidDate)?;
        self.update(ProfileUpdate::DateOfBirth(parsed)).await
    }

    pub async fn update_picture(
        &self,
        image: Vec<u8>,
        file_name: &str,
    ) -> Result<(), AccountError> {
        if image.is_empty() {
            return Err(AccountError::MissingFields);
        }
        let token = self.require_token().await?;
        self.service.update_picture(&token, image, file_name).await?;
        info!("profile picture updated");
        Ok(())
    }

    /// PNG bytes of the current user's profile picture.
    pub async fn picture(&self) -> Result<Vec<u8>, AccountError> {
        let token = self.require_token().await?;
        Ok(self.service.fetch_picture(&token).await?)
    }

    async fn update(&self, update: ProfileUpdate) -> Result<(), AccountError> {
        let token = self.require_token().await?;
        self.service.update_user(&token, update).await?;
        Ok(())
    }

    async fn require_token(&self) -> Result<String, AccountError> {
        self.token().await?.ok_or(AccountError::NotAuthenticated)
    }

    async fn store_token(&self, resp: AuthResponse) -> Result<String, AccountError> {
        let token = resp
            .unique_id
            .filter(|t| !t.is_empty())
            .ok_or(AccountError::InvalidResponse)?;
        storage::set_setting(&self.pool, USER_TOKEN_KEY, &token).await?;
        info!("session stored for user {}", resp.id);
        Ok(token)
    }
}

fn require(fields: &[&str]) -> Result<(), AccountError> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(AccountError::MissingFields);
    }
    Ok(())
}
