use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, NaiveDateTime, Utc};
use pickup_server_app::{
    domain::{GameId, game::GameFormat},
    workflow::games::{GameView, JoinedGameView, create::CreateGame},
};
use serde::{Deserialize, Serialize};

use crate::{
    ServiceError,
    http::{AppState, JsonMessage, parse_id},
    jwt::AuthUser,
};

#[derive(Deserialize)]
pub struct JsonGameCreate {
    venue: String,
    date_time: String,
    players_needed: u32,
    format: String,
    subs: Option<f64>,
    notes: Option<String>,
}

#[derive(Serialize)]
pub struct JsonGame {
    id: String,
    organiser_id: String,
    organiser_name: String,
    organiser_phone: Option<String>,
    venue: String,
    date_time: DateTime<Utc>,
    players_needed: u32,
    format: String,
    subs: Option<f64>,
    notes: Option<String>,
    status: &'static str,
    confirmed_count: usize,
    reserve_count: usize,
}

impl From<GameView> for JsonGame {
    fn from(view: GameView) -> Self {
        Self {
            id: view.id.to_string(),
            organiser_id: view.organiser_id.to_string(),
            organiser_name: view.organiser_name,
            organiser_phone: view.organiser_phone,
            venue: view.venue,
            date_time: view.scheduled_at,
            players_needed: view.players_needed,
            format: view.format.to_string(),
            subs: view.subs,
            notes: view.notes,
            status: view.status.as_str(),
            confirmed_count: view.confirmed_count,
            reserve_count: view.reserve_count,
        }
    }
}

#[derive(Serialize)]
pub struct JsonJoinedGame {
    id: String,
    venue: String,
    date_time: DateTime<Utc>,
    format: String,
    players_needed: u32,
    organiser_name: String,
    status: &'static str,
}

impl From<JoinedGameView> for JsonJoinedGame {
    fn from(view: JoinedGameView) -> Self {
        Self {
            id: view.game_id.to_string(),
            venue: view.venue,
            date_time: view.scheduled_at,
            format: view.format.to_string(),
            players_needed: view.players_needed,
            organiser_name: view.organiser_name,
            status: view.status.as_str(),
        }
    }
}

/// Accepts RFC 3339 or a naive ISO datetime, read as UTC.
fn parse_date_time(raw: &str) -> Result<DateTime<Utc>, ServiceError> {
    let raw = raw.trim();
    if let Ok(date_time) = DateTime::parse_from_rfc3339(raw) {
        return Ok(date_time.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ServiceError::BadRequest(format!("Invalid date_time: {}", raw)))
}

pub async fn create_game(
    user: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<JsonGameCreate>,
) -> Result<Json<JsonGame>, ServiceError> {
    let format = body
        .format
        .parse::<GameFormat>()
        .map_err(|e| ServiceError::BadRequest(format!("Invalid format: {}", e.0)))?;
    let scheduled_at = parse_date_time(&body.date_time)?;

    let view = state
        .app
        .game_create_use_case
        .create_game(
            user.user_id,
            CreateGame {
                venue: body.venue,
                scheduled_at,
                format,
                subs: body.subs,
                notes: body.notes,
                players_needed: body.players_needed,
            },
        )
        .await?;
    Ok(Json(view.into()))
}

pub async fn list_games(State(state): State<AppState>) -> Result<Json<Vec<JsonGame>>, ServiceError> {
    let views = state.app.game_list_use_case.list_games().await?;
    Ok(Json(views.into_iter().map(JsonGame::from).collect()))
}

pub async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JsonGame>, ServiceError> {
    let game_id: GameId = parse_id(&id, "Game")?;
    let view = state.app.game_get_use_case.get_game(game_id).await?;
    Ok(Json(view.into()))
}

pub async fn delete_game(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JsonMessage>, ServiceError> {
    let game_id: GameId = parse_id(&id, "Game")?;
    state
        .app
        .game_delete_use_case
        .delete_game(user.user_id, game_id)
        .await?;
    Ok(JsonMessage::new("Game deleted successfully"))
}

pub async fn list_my_games(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<JsonGame>>, ServiceError> {
    let views = state
        .app
        .game_list_mine_use_case
        .list_my_games(user.user_id)
        .await?;
    Ok(Json(views.into_iter().map(JsonGame::from).collect()))
}

pub async fn list_joined_games(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<JsonJoinedGame>>, ServiceError> {
    let views = state
        .app
        .game_list_joined_use_case
        .list_joined_games(user.user_id)
        .await?;
    Ok(Json(views.into_iter().map(JsonJoinedGame::from).collect()))
}
