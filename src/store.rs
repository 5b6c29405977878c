//! Remote store facade: Supabase when configured, an in-process store otherwise.
//!
//! Both backends expose the same select-then-insert surface for `users` and an
//! append-only insert for `quiz_results`.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::domain::{QuizResultRecord, UserRecord};
use crate::error::StoreError;
use crate::supabase::Supabase;

#[derive(Clone)]
pub enum Store {
  Supabase(Supabase),
  Memory(MemoryStore),
}

impl Store {
  pub fn kind(&self) -> &'static str {
    match self {
      Store::Supabase(_) => "supabase",
      Store::Memory(_) => "memory",
    }
  }

  pub async fn user_exists(&self, user_id: &str) -> Result<bool, StoreError> {
    match self {
      Store::Supabase(sb) => sb.user_exists(user_id).await,
      Store::Memory(mem) => Ok(mem.user_exists(user_id).await),
    }
  }

  pub async fn insert_user(&self, user_id: &str) -> Result<(), StoreError> {
    match self {
      Store::Supabase(sb) => sb.insert_user(user_id).await,
      Store::Memory(mem) => {
        mem.insert_user(user_id).await;
        Ok(())
      }
    }
  }

  pub async fn insert_result(&self, record: &QuizResultRecord) -> Result<(), StoreError> {
    match self {
      Store::Supabase(sb) => sb.insert_result(record).await,
      Store::Memory(mem) => {
        mem.insert_result(record.clone()).await;
        Ok(())
      }
    }
  }
}

/// In-memory tables. Contents are lost on restart.
#[derive(Clone, Default)]
pub struct MemoryStore {
  users: Arc<RwLock<Vec<UserRecord>>>,
  results: Arc<RwLock<Vec<QuizResultRecord>>>,
}

impl MemoryStore {
  pub async fn user_exists(&self, user_id: &str) -> bool {
    self.users.read().await.iter().any(|u| u.user_id == user_id)
  }

  #[instrument(level = "debug", skip(self))]
  pub async fn insert_user(&self, user_id: &str) {
    let record = UserRecord {
      id: Some(Uuid::new_v4().to_string()),
      user_id: user_id.to_string(),
      created_at: Some(Utc::now()),
    };
    debug!(target: "store", id = ?record.id, "memory user inserted");
    self.users.write().await.push(record);
  }

  #[instrument(level = "debug", skip(self, record), fields(user_id = %record.user_id))]
  pub async fn insert_result(&self, record: QuizResultRecord) {
    self.results.write().await.push(record);
  }

  #[cfg(test)]
  pub async fn users(&self) -> Vec<UserRecord> {
    self.users.read().await.clone()
  }

  #[cfg(test)]
  pub async fn results(&self) -> Vec<QuizResultRecord> {
    self.results.read().await.clone()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn memory_store_select_then_insert() {
    let mem = MemoryStore::default();
    let store = Store::Memory(mem.clone());
    assert!(!store.user_exists("SCMN1").await.expect("lookup"));
    store.insert_user("SCMN1").await.expect("insert");
    assert!(store.user_exists("SCMN1").await.expect("lookup"));
    assert!(!store.user_exists("scmn1").await.expect("lookup"));

    let users = mem.users().await;
    assert_eq!(users.len(), 1);
    assert!(users[0].id.is_some());
  }

  #[tokio::test]
  async fn results_are_append_only() {
    let mem = MemoryStore::default();
    let store = Store::Memory(mem.clone());
    let record = QuizResultRecord {
      user_id: "SCMN1".into(),
      score: 1,
      total_questions: 3,
      answers: vec!["a".into()],
      questions: vec![],
      completed_at: Utc::now(),
    };
    store.insert_result(&record).await.expect("insert");
    store.insert_result(&record).await.expect("insert");
    assert_eq!(mem.results().await.len(), 2);
  }
}
