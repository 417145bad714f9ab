use providers::RemoteFoodRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expected player answer for a quiz question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Answer {
    #[serde(rename = "Edible")]
    Edible,
    #[serde(rename = "Not Edible")]
    NotEdible,
}

impl Answer {
    /// Only the exact "Not Rotten" label is edible.
    pub fn from_food_state(food_state: &str) -> Self {
        if food_state == "Not Rotten" {
            Answer::Edible
        } else {
            Answer::NotEdible
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Answer::Edible => "Edible",
            Answer::NotEdible => "Not Edible",
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for Answer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "edible" | "e" | "y" | "yes" => Ok(Answer::Edible),
            "not edible" | "not-edible" | "n" | "no" => Ok(Answer::NotEdible),
            other => Err(format!("unknown answer: {other}")),
        }
    }
}

/// Fetchable image URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageReference(pub String);

impl ImageReference {
    pub fn resolve(base_url: &str, image_uri: &str) -> Self {
        ImageReference(providers::resolve_uri(base_url, image_uri))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub source: ImageReference,
    pub answer: Answer,
}

impl Question {
    pub fn from_record(base_url: &str, record: &RemoteFoodRecord) -> Self {
        Self {
            source: ImageReference::resolve(base_url, &record.image_uri),
            answer: Answer::from_food_state(&record.food_state),
        }
    }
}

/// Immutable question sequence. The count is always the sequence length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    pub fn as_slice(&self) -> &[Question] {
        &self.questions
    }
}

impl From<Vec<Question>> for QuestionSet {
    fn from(questions: Vec<Question>) -> Self {
        Self::new(questions)
    }
}
