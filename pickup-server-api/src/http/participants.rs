use axum::{
    Json,
    extract::{Path, Query, State},
};
use pickup_server_app::domain::{
    GameId, ParticipantId,
    participant::{JoinAction, Participant},
};
use serde::{Deserialize, Serialize};

use crate::{
    ServiceError,
    http::{AppState, JsonMessage, parse_id},
    jwt::AuthUser,
};

#[derive(Deserialize)]
pub struct JsonJoinRequest {
    game_id: String,
    action: String,
}

#[derive(Deserialize)]
pub struct WithdrawQuery {
    game_id: String,
}

#[derive(Serialize)]
pub struct JsonParticipant {
    id: String,
    game_id: String,
    user_id: String,
    user_name: String,
    user_area: Option<String>,
    user_phone: Option<String>,
    user_games_played: u32,
    status: &'static str,
}

impl From<Participant> for JsonParticipant {
    fn from(participant: Participant) -> Self {
        Self {
            id: participant.id.to_string(),
            game_id: participant.game_id.to_string(),
            user_id: participant.user_id.to_string(),
            user_name: participant.user_name,
            user_area: participant.user_area,
            user_phone: participant.user_phone,
            user_games_played: participant.user_games_played,
            status: participant.status.as_str(),
        }
    }
}

#[derive(Serialize)]
pub struct JsonApproved {
    message: &'static str,
    new_status: &'static str,
}

#[derive(Serialize)]
pub struct JsonWithdrawn {
    message: &'static str,
    was_confirmed: bool,
}

fn parse_action(raw: &str) -> Result<JoinAction, ServiceError> {
    match raw {
        "REQUESTED" => Ok(JoinAction::Request),
        "RESERVE" => Ok(JoinAction::Reserve),
        other => Err(ServiceError::BadRequest(format!("Invalid action: {}", other))),
    }
}

pub async fn join_game(
    user: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<JsonJoinRequest>,
) -> Result<Json<JsonParticipant>, ServiceError> {
    let action = parse_action(&body.action)?;
    let game_id: GameId = parse_id(&body.game_id, "Game")?;
    let participant = state
        .app
        .participant_join_use_case
        .join_game(user.user_id, game_id, action)
        .await?;
    Ok(Json(participant.into()))
}

pub async fn list_participants(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<JsonParticipant>>, ServiceError> {
    let game_id: GameId = parse_id(&id, "Game")?;
    let participants = state
        .app
        .participant_list_use_case
        .list_participants(game_id)
        .await?;
    Ok(Json(
        participants.into_iter().map(JsonParticipant::from).collect(),
    ))
}

pub async fn approve(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JsonApproved>, ServiceError> {
    let participant_id: ParticipantId = parse_id(&id, "Participant")?;
    let status = state
        .app
        .participant_approve_use_case
        .approve(user.user_id, participant_id)
        .await?;
    Ok(Json(JsonApproved {
        message: "Participant approved",
        new_status: status.as_str(),
    }))
}

pub async fn decline(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JsonMessage>, ServiceError> {
    let participant_id: ParticipantId = parse_id(&id, "Participant")?;
    state
        .app
        .participant_decline_use_case
        .decline(user.user_id, participant_id)
        .await?;
    Ok(JsonMessage::new("Request declined"))
}

pub async fn remove(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JsonMessage>, ServiceError> {
    let participant_id: ParticipantId = parse_id(&id, "Participant")?;
    state
        .app
        .participant_remove_use_case
        .remove(user.user_id, participant_id)
        .await?;
    Ok(JsonMessage::new("Participant removed"))
}

pub async fn withdraw(
    user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<WithdrawQuery>,
) -> Result<Json<JsonWithdrawn>, ServiceError> {
    let game_id: GameId = parse_id(&query.game_id, "Game")?;
    let outcome = state
        .app
        .participant_withdraw_use_case
        .withdraw(user.user_id, game_id)
        .await?;
    Ok(Json(JsonWithdrawn {
        message: "You've been removed from the game",
        was_confirmed: outcome.was_confirmed,
    }))
}
