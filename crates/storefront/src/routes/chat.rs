//! Chat widget route handlers.
//!
//! The widget is two HTMX states swapped into one container: the collapsed
//! button and the open panel. Sending a message appends to the session
//! transcript, asks the assistant endpoint, and re-renders the messages
//! area; the input form sits outside the swap so it is always usable again.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::models::chat::{self, ChatMessage, SUGGESTED_QUESTIONS};
use crate::state::AppState;

/// Send form data.
#[derive(Debug, Deserialize)]
pub struct SendForm {
    pub message: String,
}

/// Collapsed widget button fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/chat_button.html")]
pub struct ChatButtonTemplate;

/// Open panel fragment: transcript plus the input form.
#[derive(Template, WebTemplate)]
#[template(path = "partials/chat_panel.html")]
pub struct ChatPanelTemplate {
    pub messages: Vec<ChatMessage>,
    pub suggested_questions: &'static [&'static str],
}

/// Messages-area fragment (swapped on every send).
#[derive(Template, WebTemplate)]
#[template(path = "partials/chat_messages.html")]
pub struct ChatMessagesTemplate {
    pub messages: Vec<ChatMessage>,
    pub suggested_questions: &'static [&'static str],
}

/// Collapse the widget to the button.
#[instrument]
pub async fn button() -> impl IntoResponse {
    ChatButtonTemplate
}

/// Open the panel. An empty transcript shows the welcome message with the
/// suggested questions instead.
#[instrument(skip(session))]
pub async fn panel(session: Session) -> impl IntoResponse {
    let log = chat::load(&session).await;
    ChatPanelTemplate {
        messages: log.messages().to_vec(),
        suggested_questions: SUGGESTED_QUESTIONS,
    }
}

/// Send a message (HTMX).
///
/// The assistant client masks every endpoint failure with the local
/// fallback, so this always renders a bot reply, never an error.
#[instrument(skip(state, session, form))]
pub async fn send(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SendForm>,
) -> Response {
    let message = form.message.trim();
    let mut log = chat::load(&session).await;

    if !message.is_empty() {
        log.push_user(message);
        let reply = state.assistant().ask(message).await;
        log.push_bot(reply);

        if let Err(e) = chat::save(&session, &log).await {
            tracing::warn!("Failed to save chat transcript: {e}");
        }
    }

    ChatMessagesTemplate {
        messages: log.messages().to_vec(),
        suggested_questions: SUGGESTED_QUESTIONS,
    }
    .into_response()
}
