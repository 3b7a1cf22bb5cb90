use axum::{Json, extract::State};
use pickup_server_app::workflow::account::{AccountView, register::RegisterAccount};
use serde::{Deserialize, Serialize};

use crate::{ServiceError, http::AppState};

#[derive(Deserialize)]
pub struct JsonSignup {
    name: String,
    email: String,
    password: String,
    area: Option<String>,
    bio: Option<String>,
    phone: Option<String>,
}

#[derive(Deserialize)]
pub struct JsonLogin {
    email: String,
    password: String,
}

#[derive(Serialize)]
pub struct JsonUser {
    id: String,
    name: String,
    email: String,
    area: Option<String>,
    bio: Option<String>,
    phone: Option<String>,
    is_admin: bool,
    games_played: u32,
}

impl From<AccountView> for JsonUser {
    fn from(account: AccountView) -> Self {
        Self {
            id: account.id.to_string(),
            name: account.name,
            email: account.email,
            area: account.area,
            bio: account.bio,
            phone: account.phone,
            is_admin: account.is_admin,
            games_played: account.games_played,
        }
    }
}

#[derive(Serialize)]
pub struct JsonToken {
    access_token: String,
    user: JsonUser,
}

fn token_response(state: &AppState, account: AccountView) -> Result<Json<JsonToken>, ServiceError> {
    let access_token = state.jwt.issue(account.id, &account.email)?;
    Ok(Json(JsonToken {
        access_token,
        user: account.into(),
    }))
}

pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<JsonSignup>,
) -> Result<Json<JsonToken>, ServiceError> {
    let account = state
        .app
        .account_register_use_case
        .register(RegisterAccount {
            name: body.name,
            email: body.email,
            password: body.password,
            area: body.area,
            bio: body.bio,
            phone: body.phone,
        })
        .await?;
    token_response(&state, account)
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<JsonLogin>,
) -> Result<Json<JsonToken>, ServiceError> {
    let account = state
        .app
        .account_login_use_case
        .login(&body.email, &body.password)
        .await
        .inspect_err(|_| log::info!("Failed login attempt for {}", body.email))?;
    token_response(&state, account)
}
