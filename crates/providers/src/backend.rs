use crate::{
    http_client, status_error, AccountService, AuthResponse, FoodCollection, FoodItem,
    FoodRecorder, NewFoodRecord, ProfileUpdate, ProviderError, RemoteFoodRecord, UserProfile,
};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Client for the users/food REST backend.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    cfg: Arc<BackendConfig>,
}

impl BackendClient {
    pub fn new(mut cfg: BackendConfig) -> Result<Self, ProviderError> {
        cfg.base_url = cfg.base_url.trim_end_matches('/').to_string();
        Ok(Self {
            client: http_client(cfg.timeout_secs)?,
            cfg: Arc::new(cfg),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.cfg.base_url, path)
    }

    async fn post_auth<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<AuthResponse, ProviderError> {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }
        resp.json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }
}

#[async_trait::async_trait]
impl FoodCollection for BackendClient {
    async fn list_food(&self) -> Result<Vec<RemoteFoodRecord>, ProviderError> {
        let url = self.url("/api/food");
        debug!("GET {}", url);
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }
        resp.json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }

    fn base_url(&self) -> &str {
        &self.cfg.base_url
    }
}

#[async_trait::async_trait]
impl FoodRecorder for BackendClient {
    async fn add_food(&self, record: NewFoodRecord) -> Result<FoodItem, ProviderError> {
        let image = Part::bytes(record.image)
            .file_name(record.file_name)
            .mime_str("image/jpeg")
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        let form = Form::new()
            .part("image", image)
            .text("food_state", record.food_state.as_str())
            .text("food_name", record.food_name)
            .text("food_type", record.food_type);

        let resp = self
            .client
            .post(self.url("/api/food/add"))
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }
        resp.json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }

    async fn delete_food(&self, unique_id: &str) -> Result<(), ProviderError> {
        let resp = self
            .client
            .delete(self.url(&format!("/api/food/delete/{unique_id}")))
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl AccountService for BackendClient {
    async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ProviderError> {
        #[derive(Serialize)]
        struct SignupRequest<'a> {
            name: &'a str,
            email: &'a str,
            password: &'a str,
        }
        self.post_auth(
            "/signup",
            &SignupRequest {
                name,
                email,
                password,
            },
        )
        .await
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ProviderError> {
        #[derive(Serialize)]
        struct LoginRequest<'a> {
            email: &'a str,
            password: &'a str,
        }
        self.post_auth("/login", &LoginRequest { email, password })
            .await
    }

    async fn user(&self, unique_id: &str) -> Result<UserProfile, ProviderError> {
        let resp = self
            .client
            .get(self.url(&format!("/api/user/{unique_id}")))
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }
        resp.json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }

    async fn update_user(
        &self,
        unique_id: &str,
        update: ProfileUpdate,
    ) -> Result<(), ProviderError> {
        let (segment, body) = match update {
            ProfileUpdate::Profession(p) => ("profession", serde_json::json!({ "profession": p })),
            ProfileUpdate::DateOfBirth(d) => (
                "dob",
                serde_json::json!({ "date_of_birth": d.format("%Y-%m-%d").to_string() }),
            ),
            ProfileUpdate::Username(u) => ("username", serde_json::json!({ "username": u })),
        };
        let resp = self
            .client
            .put(self.url(&format!("/api/user/{unique_id}/{segment}")))
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }
        Ok(())
    }

    async fn update_picture(
        &self,
        unique_id: &str,
        image: Vec<u8>,
        file_name: &str,
    ) -> Result<(), ProviderError> {
        let pfp = Part::bytes(image)
            .file_name(file_name.to_string())
            .mime_str("image/png")
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        let resp = self
            .client
            .put(self.url(&format!("/api/user/{unique_id}/pfp")))
            .multipart(Form::new().part("pfp", pfp))
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }
        Ok(())
    }

    async fn fetch_picture(&self, unique_id: &str) -> Result<Vec<u8>, ProviderError> {
        let resp = self
            .client
            .get(self.url(&format!("/api/user/image/{unique_id}")))
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        debug!("fetched {} byte profile picture", bytes.len());
        Ok(bytes.to_vec())
    }
}
