//! Domain models used by the backend: questions, remote records and per-question results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A multiple-choice question from the static bank.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
  pub id: u32,
  pub question: String,
  pub options: Vec<String>,
  #[serde(rename = "correctAnswer", alias = "correct_answer")]
  pub correct_answer: String,
}

impl Question {
  pub fn is_correct(&self, answer: &str) -> bool {
    self.correct_answer == answer
  }
}

/// Row of the remote `users` table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserRecord {
  #[serde(default)] pub id: Option<String>,
  pub user_id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")] pub created_at: Option<DateTime<Utc>>,
}

/// Per-question detail stored alongside a quiz result.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionResult {
  pub id: u32,
  pub question: String,
  pub selected_answer: Option<String>,
  pub correct_answer: String,
  pub is_correct: bool,
}

/// Row of the append-only remote `quiz_results` table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuizResultRecord {
  pub user_id: String,
  pub score: u32,
  pub total_questions: u32,
  pub answers: Vec<String>,
  pub questions: Vec<QuestionResult>,
  pub completed_at: DateTime<Utc>,
}
