//! WebSocket quiz runner. One socket = one quiz attempt.
//!
//! The countdown ticker and incoming client messages are multiplexed in a single task,
//! so the quiz state is only ever touched from here. Dropping the socket drops the ticker.

use std::{sync::Arc, time::Duration};
use axum::{
  extract::{
    ws::{Message, WebSocket},
    Query, State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, instrument};

use crate::error::GENERIC_FAILURE;
use crate::logic::{submit_results, SubmitError};
use crate::protocol::{question_out, summary_out, ClientWsMessage, QuizQuery, ServerWsMessage};
use crate::quiz::{QuizState, Tick};
use crate::state::AppState;
use crate::util::normalize_user_id;

#[instrument(level = "info", skip(ws, state, q))]
pub async fn ws_upgrade(
  ws: WebSocketUpgrade,
  State(state): State<Arc<AppState>>,
  Query(q): Query<QuizQuery>,
) -> impl IntoResponse {
  let user_id = session_user(q.user_id);
  info!(target: "quiz_backend", has_user = user_id.is_some(), "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state, user_id))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>, user_id: Option<String>) {
  let Some(user_id) = user_id else {
    for frame in unauthenticated_frames() {
      if socket.send(frame).await.is_err() {
        break;
      }
    }
    return;
  };

  let mut quiz = QuizState::start(&state.questions, &state.settings);
  info!(target: "quiz", %user_id, total = quiz.total(), time_left = quiz.time_left(), "Quiz started");
  if !send(&mut socket, &current_view(&quiz)).await {
    return;
  }

  let period = Duration::from_millis(state.settings.tick_millis);
  let mut ticker = interval_at(Instant::now() + period, period);
  ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

  loop {
    tokio::select! {
      _ = ticker.tick(), if !quiz.is_finished => {
        if let Some(reply) = on_tick(&mut quiz) {
          if !send(&mut socket, &reply).await {
            break;
          }
        }
      }
      msg = socket.recv() => {
        match msg {
          Some(Ok(Message::Text(txt))) => {
            let replies = match serde_json::from_str::<ClientWsMessage>(&txt) {
              Ok(incoming) => {
                debug!(target: "quiz_backend", "WS received: {:?}", &incoming);
                handle_client_ws(incoming, &state, &user_id, &mut quiz).await
              }
              Err(e) => vec![ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) }],
            };
            let mut ok = true;
            for reply in &replies {
              ok = send(&mut socket, reply).await;
              if !ok {
                break;
              }
            }
            if !ok {
              break;
            }
          }
          Some(Ok(Message::Ping(payload))) => { let _ = socket.send(Message::Pong(payload)).await; }
          Some(Ok(Message::Close(_))) | None => break,
          Some(Err(e)) => {
            debug!(target: "quiz_backend", error = %e, "WS receive error");
            break;
          }
          _ => {}
        }
      }
    }
  }
  info!(target: "quiz", %user_id, finished = quiz.is_finished, submitted = quiz.submitted(), "Quiz socket closed");
}

/// Normalized identity from the `userId` query; blank means unauthenticated.
fn session_user(raw: Option<String>) -> Option<String> {
  raw.map(|u| normalize_user_id(&u)).filter(|u| !u.is_empty())
}

/// No identity: send the client back to the gate, then hang up.
fn unauthenticated_frames() -> [Message; 2] {
  [text_frame(&ServerWsMessage::Redirect { to: "/".into() }), Message::Close(None)]
}

fn text_frame(msg: &ServerWsMessage) -> Message {
  let out = serde_json::to_string(msg).unwrap_or_else(|e| {
    serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
  });
  Message::Text(out)
}

async fn send(socket: &mut WebSocket, msg: &ServerWsMessage) -> bool {
  match socket.send(text_frame(msg)).await {
    Ok(()) => true,
    Err(e) => {
      error!(target: "quiz_backend", error = %e, "WS send error");
      false
    }
  }
}

/// Next question while running, the summary once finished.
fn current_view(quiz: &QuizState) -> ServerWsMessage {
  match question_out(quiz) {
    Some(q) => ServerWsMessage::Question(q),
    None => ServerWsMessage::Finished(summary_out(quiz)),
  }
}

fn on_tick(quiz: &mut QuizState) -> Option<ServerWsMessage> {
  match quiz.tick() {
    Tick::Running(time_left) => Some(ServerWsMessage::Tick { time_left }),
    Tick::Expired => {
      info!(target: "quiz", answered = quiz.answers.len(), total = quiz.total(), "Time is up");
      Some(ServerWsMessage::Finished(summary_out(quiz)))
    }
    Tick::Idle => None,
  }
}

#[instrument(level = "info", skip(state, quiz))]
async fn handle_client_ws(
  msg: ClientWsMessage,
  state: &AppState,
  user_id: &str,
  quiz: &mut QuizState,
) -> Vec<ServerWsMessage> {
  match msg {
    ClientWsMessage::Ping => vec![ServerWsMessage::Pong],

    ClientWsMessage::Answer { answer } => match quiz.answer(&answer) {
      Ok(correct) => {
        info!(target: "quiz", %user_id, %correct, answered = quiz.answers.len(), "Answer recorded");
        vec![current_view(quiz)]
      }
      Err(e) => vec![ServerWsMessage::Error { message: e.to_string() }],
    },

    ClientWsMessage::Submit => match submit_results(state, user_id, quiz).await {
      Ok(_) => vec![ServerWsMessage::Submitted { redirect: "/".into() }],
      Err(SubmitError::Quiz(e)) => vec![ServerWsMessage::Error { message: e.to_string() }],
      Err(SubmitError::App(_)) => vec![ServerWsMessage::Error { message: GENERIC_FAILURE.into() }],
    },
  }
}
