//! Quiz runner state: question selection, answering, countdown and result assembly.
//!
//! A `QuizState` lives for one attempt (one quiz socket). It is mutated only from the
//! task that owns the socket, so answers and timer ticks never race.

use chrono::{DateTime, Utc};
use rand::{seq::SliceRandom, Rng};
use serde::Serialize;
use thiserror::Error;

use crate::config::QuizSettings;
use crate::domain::{Question, QuestionResult, QuizResultRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
  Completed,
  TimeUp,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QuizError {
  #[error("The quiz is already finished.")]
  Finished,
  #[error("The quiz is not finished yet.")]
  NotFinished,
  #[error("'{0}' is not an option for the current question.")]
  UnknownOption(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
  Running(u32),
  Expired,
  /// Quiz already over; the countdown no longer moves.
  Idle,
}

#[derive(Clone, Debug)]
pub struct QuizState {
  pub current_question: usize,
  pub score: u32,
  pub answers: Vec<String>,
  pub is_finished: bool,
  pub questions: Vec<Question>,
  time_left: u32,
  finish_reason: Option<FinishReason>,
  submitted: bool,
}

impl QuizState {
  pub fn start(bank: &[Question], settings: &QuizSettings) -> Self {
    Self::start_with_rng(bank, settings, &mut rand::thread_rng())
  }

  /// Random permutation of the bank, truncated to `question_count`.
  pub fn start_with_rng<R: Rng + ?Sized>(bank: &[Question], settings: &QuizSettings, rng: &mut R) -> Self {
    let count = settings.question_count.min(bank.len());
    let mut questions = bank.to_vec();
    questions.shuffle(rng);
    questions.truncate(count);
    let mut state = Self {
      current_question: 0,
      score: 0,
      answers: Vec::with_capacity(count),
      is_finished: false,
      questions,
      time_left: settings.time_limit_secs,
      finish_reason: None,
      submitted: false,
    };
    if state.questions.is_empty() {
      state.finish(FinishReason::Completed);
    } else if state.time_left == 0 {
      state.finish(FinishReason::TimeUp);
    }
    state
  }

  pub fn current(&self) -> Option<&Question> {
    if self.is_finished {
      return None;
    }
    self.questions.get(self.current_question)
  }

  pub fn total(&self) -> usize {
    self.questions.len()
  }

  pub fn time_left(&self) -> u32 {
    self.time_left
  }

  pub fn finish_reason(&self) -> Option<FinishReason> {
    self.finish_reason
  }

  pub fn submitted(&self) -> bool {
    self.submitted
  }

  /// Record an answer for the current question. Returns whether it was correct.
  pub fn answer(&mut self, option: &str) -> Result<bool, QuizError> {
    let question = self.current().ok_or(QuizError::Finished)?;
    if !question.options.iter().any(|o| o == option) {
      return Err(QuizError::UnknownOption(option.to_string()));
    }
    let correct = question.is_correct(option);
    if correct {
      self.score += 1;
    }
    self.answers.push(option.to_string());
    self.current_question += 1;
    if self.current_question >= self.questions.len() {
      self.finish(FinishReason::Completed);
    }
    Ok(correct)
  }

  /// One countdown step. Reaching zero force-completes the quiz with the answers given so far.
  pub fn tick(&mut self) -> Tick {
    if self.is_finished {
      return Tick::Idle;
    }
    self.time_left = self.time_left.saturating_sub(1);
    if self.time_left == 0 {
      self.finish(FinishReason::TimeUp);
      Tick::Expired
    } else {
      Tick::Running(self.time_left)
    }
  }

  fn finish(&mut self, reason: FinishReason) {
    self.is_finished = true;
    self.finish_reason = Some(reason);
  }

  /// Per-question detail; questions past the last answer are unanswered and incorrect.
  pub fn results(&self) -> Vec<QuestionResult> {
    self
      .questions
      .iter()
      .enumerate()
      .map(|(i, q)| {
        let selected = self.answers.get(i).cloned();
        let is_correct = selected.as_deref().map(|a| q.is_correct(a)).unwrap_or(false);
        QuestionResult {
          id: q.id,
          question: q.question.clone(),
          selected_answer: selected,
          correct_answer: q.correct_answer.clone(),
          is_correct,
        }
      })
      .collect()
  }

  pub fn to_record(&self, user_id: &str, completed_at: DateTime<Utc>) -> Result<QuizResultRecord, QuizError> {
    if !self.is_finished {
      return Err(QuizError::NotFinished);
    }
    Ok(QuizResultRecord {
      user_id: user_id.to_string(),
      score: self.score,
      total_questions: self.questions.len() as u32,
      answers: self.answers.clone(),
      questions: self.results(),
      completed_at,
    })
  }

  pub fn mark_submitted(&mut self) {
    self.submitted = true;
  }
}
