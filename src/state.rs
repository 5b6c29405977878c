//! Application state: question bank, quiz settings and the remote store handle.
//!
//! Built once at startup from env + optional TOML and shared read-only across handlers.
//! If Supabase is not configured we fall back to the in-memory store.

use tracing::{error, info, instrument};

use crate::config::{load_quiz_config_from_env, QuizSettings, SupabaseSettings};
use crate::domain::Question;
use crate::seeds::seed_questions;
use crate::store::{MemoryStore, Store};
use crate::supabase::Supabase;

#[derive(Clone)]
pub struct AppState {
    pub questions: Vec<Question>,
    pub settings: QuizSettings,
    pub store: Store,
}

impl AppState {
    /// Build state from env: load config, pick the question bank, init the store.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let cfg = load_quiz_config_from_env().unwrap_or_default();

        let questions = if cfg.questions.is_empty() {
            seed_questions()
        } else {
            cfg.questions
        };
        info!(target: "quiz", bank = questions.len(), question_count = cfg.quiz.question_count, time_limit_secs = cfg.quiz.time_limit_secs, "Question bank ready");

        let store = match SupabaseSettings::from_env().map(Supabase::new) {
            Some(Ok(sb)) => {
                info!(target: "quiz_backend", base_url = %sb.base_url, "Supabase store enabled.");
                Store::Supabase(sb)
            }
            Some(Err(e)) => {
                error!(target: "quiz_backend", error = %e, "Supabase client init failed; using in-memory store.");
                Store::Memory(MemoryStore::default())
            }
            None => {
                info!(target: "quiz_backend", "Supabase disabled (no SUPABASE_URL / SUPABASE_ANON_KEY). Using in-memory store.");
                Store::Memory(MemoryStore::default())
            }
        };

        Self::with_parts(questions, cfg.quiz, store)
    }

    pub fn with_parts(questions: Vec<Question>, settings: QuizSettings, store: Store) -> Self {
        Self { questions, settings, store }
    }
}
