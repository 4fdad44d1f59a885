//! Notification route handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use herald_core::{NewNotification, Notification};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use super::error_response;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct NotificationQuery {
    pub id: Option<String>,
}

/// `GET /notifications`, or a single notification with `?id=`.
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<NotificationQuery>,
) -> Result<Response, (StatusCode, String)> {
    match query.id.filter(|id| !id.is_empty()) {
        Some(id) => {
            let notification = state.hub.get_notification(&id).map_err(error_response)?;
            Ok(Json(notification).into_response())
        }
        None => Ok(Json(state.hub.list_notifications()).into_response()),
    }
}

pub async fn get_notification(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Arc<Notification>>, (StatusCode, String)> {
    let notification = state.hub.get_notification(&id).map_err(error_response)?;
    Ok(Json(notification))
}

pub async fn create_notification(
    State(state): State<AppState>,
    payload: Result<Json<NewNotification>, JsonRejection>,
) -> Result<(StatusCode, Json<Arc<Notification>>), (StatusCode, String)> {
    let Json(req) = payload.map_err(|rejection| {
        debug!(error = %rejection, "Rejected notification body");
        (StatusCode::BAD_REQUEST, rejection.body_text())
    })?;

    let notification = state.hub.create_notification(req);

    Ok((StatusCode::CREATED, Json(notification)))
}
