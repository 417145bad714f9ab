use crate::config::CaptureDefaults;
use anyhow::Context;
use providers::{FoodItem, FoodRecorder, FoodState, FreshnessClassifier, NewFoodRecord};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone)]
pub struct CaptureInput {
    pub image: Vec<u8>,
    pub file_name: String,
    pub food_name: Option<String>,
    pub food_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CaptureOutcome {
    pub state: FoodState,
    pub item: FoodItem,
}

/// Classifies a photo and records it on the backend under the predicted label.
pub struct CaptureFlow {
    classifier: Arc<dyn FreshnessClassifier>,
    recorder: Arc<dyn FoodRecorder>,
    defaults: CaptureDefaults,
}

impl CaptureFlow {
    pub fn new(
        classifier: Arc<dyn FreshnessClassifier>,
        recorder: Arc<dyn FoodRecorder>,
        defaults: CaptureDefaults,
    ) -> Self {
        Self {
            classifier,
            recorder,
            defaults,
        }
    }

    pub async fn classify(&self, image: &[u8]) -> anyhow::Result<FoodState> {
        anyhow::ensure!(!image.is_empty(), "captured image is empty");
        let state = self
            .classifier
            .classify(image)
            .await
            .context("invalid response from prediction server")?;
        info!("Classification: {}", state);
        Ok(state)
    }

    pub async fn capture(&self, input: CaptureInput) -> anyhow::Result<CaptureOutcome> {
        let state = self.classify(&input.image).await?;
        let record = NewFoodRecord {
            image: input.image,
            file_name: input.file_name,
            food_state: state,
            food_name: input
                .food_name
                .unwrap_or_else(|| self.defaults.food_name.clone()),
            food_type: input
                .food_type
                .unwrap_or_else(|| self.defaults.food_type.clone()),
        };
        let item = self
            .recorder
            .add_food(record)
            .await
            .context("failed to send data to the backend")?;
        info!("Recorded food item {} as {}", item.unique_id, state);
        Ok(CaptureOutcome { state, item })
    }
}
