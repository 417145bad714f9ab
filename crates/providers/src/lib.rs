//! HTTP clients for the food backend and the freshness classifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub mod backend;
pub mod noop;
pub mod predict;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("not implemented")]
    NotImplemented,
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Freshness label shared by the classifier and the backend records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodState {
    #[serde(rename = "Not Rotten")]
    NotRotten,
    #[serde(rename = "Rotten")]
    Rotten,
}

impl FoodState {
    /// Class 0 is the only "fresh" class the model emits.
    pub fn from_predicted_class(class: i64) -> Self {
        if class == 0 {
            FoodState::NotRotten
        } else {
            FoodState::Rotten
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FoodState::NotRotten => "Not Rotten",
            FoodState::Rotten => "Rotten",
        }
    }
}

impl fmt::Display for FoodState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Entry of `GET /api/food`. The state is kept as sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFoodRecord {
    pub image_uri: String,
    pub food_state: String,
}

/// Body returned by `POST /api/food/add`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItem {
    #[serde(default)]
    pub id: i64,
    #[serde(rename = "_id")]
    pub unique_id: String,
    #[serde(default)]
    pub food_name: String,
    #[serde(default)]
    pub food_type: String,
    pub food_state: String,
    #[serde(default)]
    pub image_path: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewFoodRecord {
    pub image: Vec<u8>,
    pub file_name: String,
    pub food_state: FoodState,
    pub food_name: String,
    pub food_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub id: i64,
    #[serde(rename = "_id", default)]
    pub unique_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub unique_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub profession: String,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub verify_status: bool,
    /// Extension of the stored profile picture; empty when none is set.
    #[serde(default)]
    pub pfp_ext: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileUpdate {
    Profession(String),
    DateOfBirth(chrono::NaiveDate),
    Username(String),
}

#[async_trait::async_trait]
pub trait FoodCollection: Send + Sync {
    async fn list_food(&self) -> Result<Vec<RemoteFoodRecord>, ProviderError>;

    /// Base the collection's relative image URIs are resolved against.
    fn base_url(&self) -> &str;
}

#[async_trait::async_trait]
pub trait FoodRecorder: Send + Sync {
    async fn add_food(&self, record: NewFoodRecord) -> Result<FoodItem, ProviderError>;
    async fn delete_food(&self, unique_id: &str) -> Result<(), ProviderError>;
}

#[async_trait::async_trait]
pub trait FreshnessClassifier: Send + Sync {
    async fn classify(&self, image: &[u8]) -> Result<FoodState, ProviderError>;
}

#[async_trait::async_trait]
pub trait AccountService: Send + Sync {
    async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ProviderError>;
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ProviderError>;
    async fn user(&self, unique_id: &str) -> Result<UserProfile, ProviderError>;
    async fn update_user(&self, unique_id: &str, update: ProfileUpdate)
        -> Result<(), ProviderError>;
    /// Uploads a profile picture. The backend always stores it as PNG.
    async fn update_picture(
        &self,
        unique_id: &str,
        image: Vec<u8>,
        file_name: &str,
    ) -> Result<(), ProviderError>;
    /// Raw PNG bytes of the profile picture. A user without one is a 404
    /// [`ProviderError::Status`].
    async fn fetch_picture(&self, unique_id: &str) -> Result<Vec<u8>, ProviderError>;
}

/// One implementation per concern, defaulting to [`noop::NoopProvider`].
#[derive(Clone)]
pub struct ProviderSet {
    pub collection: Arc<dyn FoodCollection>,
    pub recorder: Arc<dyn FoodRecorder>,
    pub classifier: Arc<dyn FreshnessClassifier>,
    pub accounts: Arc<dyn AccountService>,
}

impl Default for ProviderSet {
    fn default() -> Self {
        let noop = Arc::new(noop::NoopProvider);
        Self {
            collection: noop.clone(),
            recorder: noop.clone(),
            classifier: noop.clone(),
            accounts: noop,
        }
    }
}

impl ProviderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(mut self, provider: Arc<dyn FoodCollection>) -> Self {
        self.collection = provider;
        self
    }

    pub fn with_recorder(mut self, provider: Arc<dyn FoodRecorder>) -> Self {
        self.recorder = provider;
        self
    }

    pub fn with_classifier(mut self, provider: Arc<dyn FreshnessClassifier>) -> Self {
        self.classifier = provider;
        self
    }

    pub fn with_accounts(mut self, provider: Arc<dyn AccountService>) -> Self {
        self.accounts = provider;
        self
    }
}

/// Joins a relative URI onto `base` with exactly one slash. Absolute URIs pass through.
pub fn resolve_uri(base: &str, uri: &str) -> String {
    if uri.starts_with("http://") || uri.starts_with("https://") {
        return uri.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        uri.trim_start_matches('/')
    )
}

pub(crate) fn http_client(timeout_secs: u64) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ProviderError::RequestFailed(format!("http client build failed: {e}")))
}

/// Turns a non-2xx response into [`ProviderError::Status`], preferring the
/// backend's `error` or `message` field over the raw body.
pub(crate) async fn status_error(resp: reqwest::Response) -> ProviderError {
    let status = resp.status().as_u16();
    let body = resp.bytes().await.unwrap_or_default();
    ProviderError::Status {
        status,
        message: error_message(&body),
    }
}

fn error_message(body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        for key in ["error", "message"] {
            if let Some(msg) = value.get(key).and_then(|m| m.as_str()) {
                return msg.to_string();
            }
        }
    }
    String::from_utf8_lossy(body).into_owned()
}
