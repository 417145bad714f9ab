//! "Is this edible?" quiz over a question set.

use crate::models::{Answer, Question, QuestionSet};
use crate::questions::QuestionSupplier;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalScore {
    pub score: u32,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOutcome {
    pub correct: bool,
    pub chosen: Answer,
    pub expected: Answer,
    pub game_over: Option<FinalScore>,
}

#[derive(Debug, Clone)]
pub struct QuizGame {
    questions: Arc<QuestionSet>,
    index: usize,
    score: u32,
}

impl QuizGame {
    pub fn new(questions: Arc<QuestionSet>) -> Self {
        Self {
            questions,
            index: 0,
            score: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.index)
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Restores a running score saved by an earlier session.
    pub fn resume_score(&mut self, score: u32) {
        self.score = score.min(self.total() as u32);
    }

    /// Scores the choice against the current question and advances. The last
    /// question ends the round and resets index and score.
    pub fn choose(&mut self, chosen: Answer) -> Option<ChoiceOutcome> {
        let expected = self.current()?.answer;
        let correct = chosen == expected;
        if correct {
            self.score += 1;
        }

        let game_over = if self.index + 1 < self.questions.len() {
            self.index += 1;
            None
        } else {
            let final_score = FinalScore {
                score: self.score,
                total: self.questions.len(),
            };
            self.index = 0;
            self.score = 0;
            Some(final_score)
        };

        Some(ChoiceOutcome {
            correct,
            chosen,
            expected,
            game_over,
        })
    }

    /// Refreshes the supplier and restarts with the new set.
    pub async fn next_round(&mut self, supplier: &QuestionSupplier) {
        self.questions = supplier.refresh().await;
        self.index = 0;
        self.score = 0;
    }
}
