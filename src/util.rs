//! Small utility helpers used across modules.

/// Canonical form of a user-entered identifier: surrounding whitespace removed, upper-cased.
/// Lookups and inserts always use this form.
pub fn normalize_user_id(raw: &str) -> String {
  raw.trim().to_uppercase()
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge response bodies from the store.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    s.to_string()
  } else {
    format!("{}… ({} bytes total)", s.chars().take(max).collect::<String>(), s.len())
  }
}
