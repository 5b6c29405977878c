//! Loading quiz configuration (timing knobs + optional question bank) from TOML.
//!
//! See `QuizConfig` and `QuizSettings` for expected schema.

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::domain::Question;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct QuizConfig {
  #[serde(default)]
  pub quiz: QuizSettings,
  #[serde(default)]
  pub questions: Vec<Question>,
}

/// Per-attempt knobs. Defaults match the classic three-questions-in-ten-seconds test.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct QuizSettings {
  pub question_count: usize,
  pub time_limit_secs: u32,
  pub tick_millis: u64,
}

impl Default for QuizSettings {
  fn default() -> Self {
    Self { question_count: 3, time_limit_secs: 10, tick_millis: 1000 }
  }
}

/// Credentials for the hosted store. Both must be present to enable it.
#[derive(Clone, Debug)]
pub struct SupabaseSettings {
  pub url: String,
  pub anon_key: String,
}

impl SupabaseSettings {
  pub fn from_env() -> Option<Self> {
    let url = std::env::var("SUPABASE_URL").ok().filter(|s| !s.trim().is_empty())?;
    let anon_key = std::env::var("SUPABASE_ANON_KEY").ok().filter(|s| !s.trim().is_empty())?;
    Some(Self { url: url.trim_end_matches('/').to_string(), anon_key })
  }
}

pub fn parse_quiz_config(s: &str) -> Result<QuizConfig, toml::de::Error> {
  toml::from_str::<QuizConfig>(s)
}

/// Drop questions that cannot be answered correctly; clamp zero settings to sane minimums.
pub fn sanitize(mut cfg: QuizConfig) -> QuizConfig {
  cfg.questions.retain(|q| {
    let ok = q.options.contains(&q.correct_answer);
    if !ok {
      warn!(target: "quiz", id = q.id, "Skipping bank item: correct answer is not among the options.");
    }
    ok
  });
  if cfg.quiz.question_count == 0 {
    warn!(target: "quiz", "question_count = 0 is not usable; using 1");
    cfg.quiz.question_count = 1;
  }
  if cfg.quiz.tick_millis == 0 {
    warn!(target: "quiz", "tick_millis = 0 is not usable; using 1000");
    cfg.quiz.tick_millis = 1000;
  }
  cfg
}

/// Attempt to load `QuizConfig` from QUIZ_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_quiz_config_from_env() -> Option<QuizConfig> {
  let path = std::env::var("QUIZ_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_quiz_config(&s) {
      Ok(cfg) => {
        info!(target: "quiz_backend", %path, questions = cfg.questions.len(), "Loaded quiz config (TOML)");
        Some(sanitize(cfg))
      }
      Err(e) => {
        error!(target: "quiz_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "quiz_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
