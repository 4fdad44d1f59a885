//! Liveness endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub notifications: usize,
    pub connections: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        notifications: state.hub.notification_count(),
        connections: state.hub.connection_count(),
    })
}
