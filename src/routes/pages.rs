//! The two screens of the navigation shell, embedded in the binary.

use axum::response::{Html, IntoResponse, Redirect};

const LOGIN_PAGE: &str = include_str!("../../assets/login.html");
const QUIZ_PAGE: &str = include_str!("../../assets/quiz.html");

pub async fn identity_page() -> Html<&'static str> {
  Html(LOGIN_PAGE)
}

pub async fn quiz_page() -> Html<&'static str> {
  Html(QUIZ_PAGE)
}

/// Any unknown path goes back to the identity screen.
pub async fn redirect_home() -> impl IntoResponse {
  Redirect::to("/")
}
