//! Quiz questions derived from the backend's food collection.
//!
//! [`QuestionSupplier`] fetches records, maps them to [`Question`]s and
//! publishes a bounded random subset on a [`QuestionBoard`] owned by the
//! caller. Fetch failures never surface as errors: they are logged and the
//! board shows an empty set.

use crate::models::{Question, QuestionSet};
use providers::{FoodCollection, ProviderError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use tracing::{debug, warn};

pub const DEFAULT_QUESTION_LIMIT: usize = 10;

/// Shared handle to the currently exposed question set.
///
/// Cloning yields another handle to the same state. The set is swapped as a
/// whole, so a reader always sees one fetch's result with its own length.
#[derive(Debug, Clone, Default)]
pub struct QuestionBoard {
    inner: Arc<RwLock<Arc<QuestionSet>>>,
}

impl QuestionBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> Arc<QuestionSet> {
        self.inner.read().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.inner.read().await.len()
    }

    async fn replace(&self, set: Arc<QuestionSet>) {
        *self.inner.write().await = set;
    }
}

pub struct QuestionSupplier {
    collection: Arc<dyn FoodCollection>,
    board: QuestionBoard,
    limit: usize,
    seeded: Option<Mutex<StdRng>>,
}

impl QuestionSupplier {
    pub fn new(collection: Arc<dyn FoodCollection>, board: QuestionBoard) -> Self {
        Self {
            collection,
            board,
            limit: DEFAULT_QUESTION_LIMIT,
            seeded: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Deterministic sampling, for tests and reproducible sessions.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.seeded = Some(Mutex::new(StdRng::seed_from_u64(seed)));
        self
    }

    pub fn board(&self) -> &QuestionBoard {
        &self.board
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Fetches and samples a fresh question list. Returns an empty list on any failure.
    pub async fn fetch(&self) -> Vec<Question> {
        let records = match self.collection.list_food().await {
            Ok(records) => records,
            Err(e) => {
                warn!(kind = failure_kind(&e), error = %e, "question fetch failed");
                return Vec::new();
            }
        };
        let base = self.collection.base_url();
        let questions: Vec<Question> = records
            .iter()
            .map(|r| Question::from_record(base, r))
            .collect();
        debug!("fetched {} questions", questions.len());

        match &self.seeded {
            Some(rng) => {
                let mut rng = rng.lock().unwrap_or_else(|e| e.into_inner());
                sample_questions(questions, self.limit, &mut *rng)
            }
            None => sample_questions(questions, self.limit, &mut rand::thread_rng()),
        }
    }

    /// Fetches and publishes the result on the board in a single swap.
    pub async fn refresh(&self) -> Arc<QuestionSet> {
        let set = Arc::new(QuestionSet::new(self.fetch().await));
        self.board.replace(set.clone()).await;
        set
    }

    pub async fn questions(&self) -> Arc<QuestionSet> {
        self.board.snapshot().await
    }

    pub async fn count(&self) -> usize {
        self.board.count().await
    }
}

/// Keeps everything when `questions.len() <= limit`, otherwise a uniform
/// subset of `limit` items chosen by a partial Fisher-Yates shuffle.
pub fn sample_questions<R: Rng + ?Sized>(
    mut questions: Vec<Question>,
    limit: usize,
    rng: &mut R,
) -> Vec<Question> {
    if questions.len() <= limit {
        return questions;
    }
    let (chosen, _) = questions.partial_shuffle(rng, limit);
    chosen.to_vec()
}

fn failure_kind(err: &ProviderError) -> &'static str {
    match err {
        ProviderError::RequestFailed(_) => "transport",
        ProviderError::Status { .. } => "status",
        ProviderError::InvalidResponse(_) => "payload",
        ProviderError::NotImplemented => "unavailable",
    }
}
