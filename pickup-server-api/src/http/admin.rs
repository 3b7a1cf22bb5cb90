use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use pickup_server_app::{domain::UserId, workflow::account::UserSummary};
use serde::Serialize;

use crate::{
    ServiceError,
    http::{AppState, JsonMessage, parse_id},
    jwt::AuthUser,
};

#[derive(Serialize)]
pub struct JsonUserSummary {
    id: String,
    name: String,
    email: String,
    area: Option<String>,
    bio: Option<String>,
    games_played: u32,
    games_confirmed: u32,
    no_shows: u32,
    created_at: DateTime<Utc>,
}

impl From<UserSummary> for JsonUserSummary {
    fn from(user: UserSummary) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name,
            email: user.email,
            area: user.area,
            bio: user.bio,
            games_played: user.games_played,
            games_confirmed: user.games_confirmed,
            no_shows: user.no_shows,
            created_at: user.created_at,
        }
    }
}

pub async fn list_users(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<JsonUserSummary>>, ServiceError> {
    let users = state
        .app
        .admin_list_users_use_case
        .list_users(user.user_id)
        .await?;
    Ok(Json(users.into_iter().map(JsonUserSummary::from).collect()))
}

pub async fn remove_user(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JsonMessage>, ServiceError> {
    let target: UserId = parse_id(&id, "User")?;
    state
        .app
        .admin_remove_user_use_case
        .remove_user(user.user_id, target)
        .await?;
    Ok(JsonMessage::new("User deleted successfully"))
}
