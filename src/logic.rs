//! Core behaviors shared by the HTTP and WebSocket handlers.
//!
//! This includes:
//!   - The identity gate (normalize, look up, insert when absent)
//!   - Submitting a finished quiz exactly once

use chrono::Utc;
use tracing::{error, info, instrument};

use crate::error::AppError;
use crate::quiz::{QuizError, QuizState};
use crate::state::AppState;
use crate::util::normalize_user_id;

#[derive(Debug, PartialEq, Eq)]
pub struct Login {
  pub user_id: String,
  pub created: bool,
}

/// Select-then-insert on the normalized identifier. Not transactional.
#[instrument(level = "info", skip(state, raw), fields(raw_len = raw.len()))]
pub async fn login(state: &AppState, raw: &str) -> Result<Login, AppError> {
  let user_id = normalize_user_id(raw);
  if user_id.is_empty() {
    return Err(AppError::Validation("Please enter your ID.".into()));
  }

  let exists = state.store.user_exists(&user_id).await.map_err(|e| {
    error!(target: "identity", %user_id, error = %e, "User lookup failed");
    e
  })?;

  if !exists {
    state.store.insert_user(&user_id).await.map_err(|e| {
      error!(target: "identity", %user_id, error = %e, "User insert failed");
      e
    })?;
  }

  info!(target: "identity", %user_id, created = !exists, "User identified");
  Ok(Login { user_id, created: !exists })
}

#[derive(Debug, PartialEq, Eq)]
pub enum Submission {
  Stored,
  AlreadySubmitted,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
  #[error(transparent)]
  Quiz(#[from] QuizError),
  #[error(transparent)]
  App(#[from] AppError),
}

/// Insert the result record once. Later calls are acknowledged without writing.
/// A failed insert leaves the quiz unsubmitted so the user can retry.
#[instrument(level = "info", skip(state, quiz), fields(score = quiz.score))]
pub async fn submit_results(state: &AppState, user_id: &str, quiz: &mut QuizState) -> Result<Submission, SubmitError> {
  if quiz.submitted() {
    info!(target: "quiz", %user_id, "Duplicate submit ignored");
    return Ok(Submission::AlreadySubmitted);
  }
  let record = quiz.to_record(user_id, Utc::now())?;
  if let Err(e) = state.store.insert_result(&record).await {
    error!(target: "quiz", %user_id, error = %e, "Saving quiz results failed");
    return Err(AppError::from(e).into());
  }
  quiz.mark_submitted();
  info!(target: "quiz", %user_id, score = record.score, total = record.total_questions, "Quiz results stored");
  Ok(Submission::Stored)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::{QuizSettings, SupabaseSettings};
  use crate::seeds::seed_questions;
  use crate::store::{MemoryStore, Store};
  use crate::supabase::Supabase;
  use crate::quiz::Tick;

  fn memory_state() -> (AppState, MemoryStore) {
    let mem = MemoryStore::default();
    let state = AppState::with_parts(seed_questions(), QuizSettings::default(), Store::Memory(mem.clone()));
    (state, mem)
  }

  /// Points at a closed local port so every call fails at the transport layer.
  fn unreachable_state() -> AppState {
    let sb = Supabase::new(SupabaseSettings { url: "http://127.0.0.1:9".into(), anon_key: "k".into() })
      .expect("client");
    AppState::with_parts(seed_questions(), QuizSettings::default(), Store::Supabase(sb))
  }

  #[tokio::test]
  async fn login_normalizes_and_creates_once() {
    let (state, mem) = memory_state();

    let first = login(&state, "  scmn1234 ").await.expect("login");
    assert_eq!(first, Login { user_id: "SCMN1234".into(), created: true });

    let again = login(&state, "SCMN1234").await.expect("login");
    assert!(!again.created);
    login(&state, "\tScMn1234").await.expect("login");

    let users = mem.users().await;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].user_id, "SCMN1234");
  }

  #[tokio::test]
  async fn blank_login_is_rejected_without_store_call() {
    let (state, mem) = memory_state();
    let err = login(&state, "   ").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(mem.users().await.is_empty());
  }

  #[tokio::test]
  async fn store_failure_surfaces_as_store_error() {
    let state = unreachable_state();
    let err = login(&state, "scmn1").await.unwrap_err();
    assert!(matches!(err, AppError::Store(_)));
  }

  #[tokio::test]
  async fn submit_happens_at_most_once() {
    let (state, mem) = memory_state();
    let mut quiz = QuizState::start(&state.questions, &state.settings);
    let q = quiz.current().cloned().expect("question");
    quiz.answer(&q.correct_answer).expect("answer");
    while quiz.tick() != Tick::Expired {}

    assert_eq!(submit_results(&state, "SCMN1", &mut quiz).await.expect("submit"), Submission::Stored);
    for _ in 0..3 {
      assert_eq!(
        submit_results(&state, "SCMN1", &mut quiz).await.expect("submit"),
        Submission::AlreadySubmitted
      );
    }

    let results = mem.results().await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].score, 1);
    assert_eq!(results[0].answers.len(), 1);
    assert_eq!(results[0].total_questions, 3);
  }

  #[tokio::test]
  async fn submit_before_finish_is_refused() {
    let (state, mem) = memory_state();
    let mut quiz = QuizState::start(&state.questions, &state.settings);
    let err = submit_results(&state, "SCMN1", &mut quiz).await.unwrap_err();
    assert!(matches!(err, SubmitError::Quiz(QuizError::NotFinished)));
    assert!(mem.results().await.is_empty());
  }

  #[tokio::test]
  async fn failed_submit_can_be_retried() {
    let state = unreachable_state();
    let mut quiz = QuizState::start(&state.questions, &state.settings);
    while quiz.tick() != Tick::Expired {}
    assert!(submit_results(&state, "SCMN1", &mut quiz).await.is_err());
    assert!(!quiz.submitted());
  }
}
