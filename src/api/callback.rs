use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::mpsc;

use crate::{Error, Res, spotify::auth::TokenExchange, types::Credential, warning};

/// Shared with the callback handler for one authorization attempt.
#[derive(Clone)]
pub struct CallbackState {
    expected_state: String,
    exchange: TokenExchange,
    sender: mpsc::Sender<Res<Credential>>,
    delivered: Arc<AtomicBool>,
}

impl CallbackState {
    pub fn new(
        expected_state: String,
        exchange: TokenExchange,
        sender: mpsc::Sender<Res<Credential>>,
    ) -> Self {
        Self {
            expected_state,
            exchange,
            sender,
            delivered: Arc::new(AtomicBool::new(false)),
        }
    }

    /// True once an outcome has been handed to the waiting flow.
    pub fn is_delivered(&self) -> bool {
        self.delivered.load(Ordering::SeqCst)
    }

    fn deliver(&self, outcome: Res<Credential>) {
        // only the first outcome matters, the flow stops listening after it
        if self.sender.try_send(outcome).is_err() {
            warning!("Ignoring a repeated authorization callback");
            return;
        }
        self.delivered.store(true, Ordering::SeqCst);
    }
}

pub const ACCESS_GRANTED: &str =
    "Access granted. You can close this tab and return to the application.";
pub const LOGIN_FAILED: &str = "Login failed. Return to the application for details.";
pub const STATE_MISMATCH: &str = "Authorization state does not match. Please start again from the application.";
pub const MISSING_CODE: &str = "Missing authorization code.";

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<Arc<CallbackState>>,
) -> Html<&'static str> {
    if params.get("state") != Some(&state.expected_state) {
        return Html(STATE_MISMATCH);
    }

    if let Some(error) = params.get("error") {
        state.deliver(Err(Error::Authorization(format!(
            "Spotify refused access: {}",
            error
        ))));
        return Html(LOGIN_FAILED);
    }

    let Some(code) = params.get("code") else {
        return Html(MISSING_CODE);
    };

    match state.exchange.exchange(code).await {
        Ok(credential) => {
            state.deliver(Ok(credential));
            Html(ACCESS_GRANTED)
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            state.deliver(Err(e));
            Html(LOGIN_FAILED)
        }
    }
}
