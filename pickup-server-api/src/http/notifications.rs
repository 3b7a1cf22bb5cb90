use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use pickup_server_app::domain::{NotificationId, notification::Notification};
use serde::Serialize;

use crate::{
    ServiceError,
    http::{AppState, JsonMessage, parse_id},
    jwt::AuthUser,
};

#[derive(Serialize)]
pub struct JsonNotification {
    id: String,
    #[serde(rename = "type")]
    kind: &'static str,
    message: String,
    game_id: Option<String>,
    created_at: DateTime<Utc>,
    read: bool,
}

impl From<Notification> for JsonNotification {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id.to_string(),
            kind: notification.kind.as_str(),
            message: notification.message,
            game_id: notification.game_id.map(|id| id.to_string()),
            created_at: notification.created_at,
            read: notification.read,
        }
    }
}

#[derive(Serialize)]
pub struct JsonCount {
    count: usize,
}

pub async fn list_notifications(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<JsonNotification>>, ServiceError> {
    let notifications = state
        .app
        .notification_list_use_case
        .list_notifications(user.user_id)
        .await?;
    Ok(Json(
        notifications
            .into_iter()
            .map(JsonNotification::from)
            .collect(),
    ))
}

pub async fn mark_read(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JsonMessage>, ServiceError> {
    let notification_id: NotificationId = parse_id(&id, "Notification")?;
    state
        .app
        .notification_mark_read_use_case
        .mark_read(user.user_id, notification_id)
        .await?;
    Ok(JsonMessage::new("Marked as read"))
}

pub async fn count_unread(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<JsonCount>, ServiceError> {
    let count = state
        .app
        .notification_count_use_case
        .count_unread(user.user_id)
        .await?;
    Ok(Json(JsonCount { count }))
}
