use crate::{http_client, status_error, FoodState, FreshnessClassifier, ProviderError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct PredictConfig {
    pub predict_url: String,
    pub timeout_secs: u64,
}

/// Client for the image classification service (`POST /predict/`).
#[derive(Clone)]
pub struct PredictClient {
    client: Client,
    cfg: Arc<PredictConfig>,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    image: &'a str,
}

// The service reports failures as `{"error": ...}` with a 200 status.
#[derive(Debug, Deserialize)]
struct PredictResponse {
    predicted_class: Option<i64>,
    error: Option<String>,
}

impl PredictClient {
    pub fn new(cfg: PredictConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http_client(cfg.timeout_secs)?,
            cfg: Arc::new(cfg),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/predict/", self.cfg.predict_url.trim_end_matches('/'))
    }
}

fn parse_prediction(parsed: PredictResponse) -> Result<FoodState, ProviderError> {
    match (parsed.predicted_class, parsed.error) {
        (Some(class), _) => Ok(FoodState::from_predicted_class(class)),
        (None, Some(err)) => Err(ProviderError::InvalidResponse(err)),
        (None, None) => Err(ProviderError::InvalidResponse(
            "missing predicted_class".into(),
        )),
    }
}

#[async_trait::async_trait]
impl FreshnessClassifier for PredictClient {
    async fn classify(&self, image: &[u8]) -> Result<FoodState, ProviderError> {
        let encoded = STANDARD.encode(image);
        let url = self.endpoint();
        debug!("POST {} ({} image bytes)", url, image.len());

        let resp = self
            .client
            .post(url)
            .json(&PredictRequest { image: &encoded })
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }
        let parsed: PredictResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        parse_prediction(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<FoodState, ProviderError> {
        parse_prediction(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn maps_predicted_class() {
        assert_eq!(parse(r#"{"predicted_class": 0}"#).unwrap(), FoodState::NotRotten);
        assert_eq!(parse(r#"{"predicted_class": 1}"#).unwrap(), FoodState::Rotten);
    }

    #[test]
    fn error_body_is_invalid_response() {
        let err = parse(r#"{"error": "cannot identify image file"}"#).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(msg) if msg.contains("identify")));
        assert!(parse("{}").is_err());
    }

    #[test]
    fn endpoint_has_single_trailing_path() {
        let client = PredictClient::new(PredictConfig {
            predict_url: "http://10.0.0.2:8000/".into(),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(client.endpoint(), "http://10.0.0.2:8000/predict/");
    }
}
