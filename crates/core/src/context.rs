use crate::account::Accounts;
use crate::capture::CaptureFlow;
use crate::config::AppConfig;
use crate::questions::{QuestionBoard, QuestionSupplier};
use anyhow::Context;
use providers::backend::{BackendClient, BackendConfig};
use providers::predict::{PredictClient, PredictConfig};
use providers::ProviderSet;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::info;

/// Wires HTTP providers from the configured endpoints.
pub fn build_providers(config: &AppConfig) -> anyhow::Result<ProviderSet> {
    let backend = Arc::new(
        BackendClient::new(BackendConfig {
            base_url: config.backend.base_url.clone(),
            timeout_secs: config.http.timeout_secs,
        })
        .context("backend client")?,
    );
    let classifier = Arc::new(
        PredictClient::new(PredictConfig {
            predict_url: config.classifier.predict_url.clone(),
            timeout_secs: config.http.timeout_secs,
        })
        .context("classifier client")?,
    );
    info!(
        "backend at {}, classifier at {}",
        config.backend.base_url, config.classifier.predict_url
    );
    Ok(ProviderSet::new()
        .with_collection(backend.clone())
        .with_recorder(backend.clone())
        .with_accounts(backend)
        .with_classifier(classifier))
}

/// Everything a front-end session needs, built once per session.
pub struct AppContext {
    pub config: AppConfig,
    pub providers: ProviderSet,
    pub pool: SqlitePool,
}

impl AppContext {
    pub async fn open(config: AppConfig) -> anyhow::Result<Self> {
        let providers = build_providers(&config)?;
        Self::with_providers(config, providers).await
    }

    pub async fn with_providers(config: AppConfig, providers: ProviderSet) -> anyhow::Result<Self> {
        let pool = storage::open(&config.database.path)
            .await
            .context("db open")?;
        Ok(Self {
            config,
            providers,
            pool,
        })
    }

    pub fn question_supplier(&self, board: QuestionBoard) -> QuestionSupplier {
        QuestionSupplier::new(self.providers.collection.clone(), board)
            .with_limit(self.config.quiz.max_questions)
    }

    pub fn capture_flow(&self) -> CaptureFlow {
        CaptureFlow::new(
            self.providers.classifier.clone(),
            self.providers.recorder.clone(),
            self.config.capture.clone(),
        )
    }

    pub fn accounts(&self) -> Accounts {
        Accounts::new(self.providers.accounts.clone(), self.pool.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_providers_yield_empty_quiz() {
        let temp = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.database.path = temp.path().join("ctx.db").to_string_lossy().into_owned();
        config.quiz.max_questions = 4;

        let ctx = AppContext::with_providers(config, ProviderSet::new())
            .await
            .unwrap();
        let supplier = ctx.question_supplier(QuestionBoard::new());
        assert_eq!(supplier.limit(), 4);
        supplier.refresh().await;
        assert_eq!(supplier.count().await, 0);
        assert!(ctx.capture_flow().classify(b"img").await.is_err());
    }

    #[test]
    fn builds_http_providers_from_defaults() {
        let providers = build_providers(&AppConfig::default()).unwrap();
        assert_eq!(providers.collection.base_url(), "http://localhost:3000");
    }
}
