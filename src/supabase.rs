//! Minimal Supabase (PostgREST) client for the two tables we touch.
//!
//! We only select users by `user_id` and append rows to `users` / `quiz_results`.
//! Calls are instrumented and log table names, latencies and status codes (not row contents).
//!
//! NOTE: We never log the API key.

use std::time::{Duration, Instant};

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::config::SupabaseSettings;
use crate::domain::QuizResultRecord;
use crate::error::StoreError;
use crate::util::trunc_for_log;

const USERS: &str = "users";
const QUIZ_RESULTS: &str = "quiz_results";

#[derive(Clone)]
pub struct Supabase {
  pub client: reqwest::Client,
  pub base_url: String,
  api_key: String,
}

#[derive(Serialize)]
struct NewUser<'a> {
  user_id: &'a str,
}

impl Supabase {
  pub fn new(settings: SupabaseSettings) -> Result<Self, StoreError> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(10))
      .build()?;
    Ok(Self { client, base_url: settings.url, api_key: settings.anon_key })
  }

  fn table_url(&self, table: &str) -> String {
    format!("{}/rest/v1/{}", self.base_url, table)
  }

  fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    req
      .header(USER_AGENT, "section-quiz-backend/0.1")
      .header("apikey", &self.api_key)
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
  }

  /// True when at least one `users` row carries this (already normalized) id.
  #[instrument(level = "info", skip(self), fields(table = USERS))]
  pub async fn user_exists(&self, user_id: &str) -> Result<bool, StoreError> {
    let start = Instant::now();
    let filter = format!("eq.{}", user_id);
    let res = self
      .authed(self.client.get(self.table_url(USERS)))
      .query(&[("select", "id"), ("user_id", filter.as_str())])
      .send()
      .await?;
    let res = check_status(res).await?;
    let rows: Vec<serde_json::Value> = res.json().await?;
    info!(target: "store", elapsed = ?start.elapsed(), rows = rows.len(), "users lookup done");
    Ok(!rows.is_empty())
  }

  #[instrument(level = "info", skip(self), fields(table = USERS))]
  pub async fn insert_user(&self, user_id: &str) -> Result<(), StoreError> {
    self.insert(USERS, &[NewUser { user_id }]).await
  }

  #[instrument(level = "info", skip(self, record), fields(table = QUIZ_RESULTS, user_id = %record.user_id, score = record.score))]
  pub async fn insert_result(&self, record: &QuizResultRecord) -> Result<(), StoreError> {
    self.insert(QUIZ_RESULTS, std::slice::from_ref(record)).await
  }

  async fn insert<T: Serialize>(&self, table: &str, rows: &[T]) -> Result<(), StoreError> {
    let start = Instant::now();
    let res = self
      .authed(self.client.post(self.table_url(table)))
      .header(CONTENT_TYPE, "application/json")
      .header("Prefer", "return=minimal")
      .json(rows)
      .send()
      .await?;
    check_status(res).await?;
    info!(target: "store", %table, elapsed = ?start.elapsed(), rows = rows.len(), "insert done");
    Ok(())
  }
}

async fn check_status(res: reqwest::Response) -> Result<reqwest::Response, StoreError> {
  if res.status().is_success() {
    return Ok(res);
  }
  let status = res.status().as_u16();
  let body = res.text().await.unwrap_or_default();
  let msg = extract_postgrest_error(&body).unwrap_or_else(|| trunc_for_log(&body, 200));
  warn!(target: "store", status, "store request rejected");
  Err(StoreError::Status { status, body: msg })
}

/// PostgREST errors look like `{"code": "...", "message": "...", "details": ...}`.
fn extract_postgrest_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct PgErr {
    message: Option<String>,
    code: Option<String>,
  }
  let e: PgErr = serde_json::from_str(body).ok()?;
  match (e.code, e.message) {
    (Some(code), Some(message)) => Some(format!("{code}: {message}")),
    (None, Some(message)) => Some(message),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn postgrest_error_message_is_extracted() {
    let body = r#"{"code":"23505","details":null,"hint":null,"message":"duplicate key"}"#;
    assert_eq!(extract_postgrest_error(body).as_deref(), Some("23505: duplicate key"));
    assert_eq!(extract_postgrest_error("<html>oops</html>"), None);
  }

  #[test]
  fn table_urls_are_rest_paths() {
    let sb = Supabase::new(SupabaseSettings {
      url: "https://example.supabase.co".into(),
      anon_key: "k".into(),
    })
    .expect("client");
    assert_eq!(sb.table_url(USERS), "https://example.supabase.co/rest/v1/users");
  }
}
