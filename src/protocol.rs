//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::QuestionResult;
use crate::quiz::{FinishReason, QuizState};

/// Messages the quiz screen sends over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Answer { answer: String },
    Submit,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Question(QuestionOut),
    Tick {
        #[serde(rename = "timeLeft")]
        time_left: u32,
    },
    Finished(SummaryOut),
    Submitted {
        redirect: String,
    },
    Redirect {
        to: String,
    },
    Error {
        message: String,
    },
}

/// The question currently on screen. Never carries the correct answer.
#[derive(Debug, Serialize)]
pub struct QuestionOut {
    pub index: usize,
    pub total: usize,
    pub question: String,
    pub options: Vec<String>,
    pub score: u32,
    #[serde(rename = "timeLeft")]
    pub time_left: u32,
}

#[derive(Debug, Serialize)]
pub struct SummaryOut {
    pub score: u32,
    pub total: usize,
    pub reason: Option<FinishReason>,
    pub questions: Vec<QuestionResult>,
}

/// Current question, or `None` once the quiz is over.
pub fn question_out(quiz: &QuizState) -> Option<QuestionOut> {
    let q = quiz.current()?;
    Some(QuestionOut {
        index: quiz.current_question,
        total: quiz.total(),
        question: q.question.clone(),
        options: q.options.clone(),
        score: quiz.score,
        time_left: quiz.time_left(),
    })
}

pub fn summary_out(quiz: &QuizState) -> SummaryOut {
    SummaryOut {
        score: quiz.score,
        total: quiz.total(),
        reason: quiz.finish_reason(),
        questions: quiz.results(),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct LoginIn {
    #[serde(rename = "userId")]
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginOut {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub created: bool,
}

#[derive(Debug, Deserialize)]
pub struct QuizQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    pub store: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorOut {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_are_type_tagged() {
        let msg: ClientWsMessage = serde_json::from_str(r#"{"type":"answer","answer":"Green"}"#).expect("parse");
        assert!(matches!(msg, ClientWsMessage::Answer { ref answer } if answer == "Green"));
        let msg: ClientWsMessage = serde_json::from_str(r#"{"type":"submit"}"#).expect("parse");
        assert!(matches!(msg, ClientWsMessage::Submit));
    }

    #[test]
    fn server_messages_use_camel_time_left() {
        let v = serde_json::to_value(ServerWsMessage::Tick { time_left: 4 }).expect("json");
        assert_eq!(v, serde_json::json!({"type": "tick", "timeLeft": 4}));

        let v = serde_json::to_value(ServerWsMessage::Redirect { to: "/".into() }).expect("json");
        assert_eq!(v["type"], "redirect");
    }
}
