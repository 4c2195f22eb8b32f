use std::sync::Arc;

use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::api::CallbackState;

/// Liveness of the callback server and whether Spotify has redirected back yet.
pub async fn health(Extension(state): Extension<Arc<CallbackState>>) -> Json<Value> {
    let authorization = if state.is_delivered() {
        "received"
    } else {
        "waiting"
    };

    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "authorization": authorization
    }))
}
