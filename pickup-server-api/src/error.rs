use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pickup_server_app::workflow::{
    account::{AdminError, login::LoginError, register::RegisterError},
    games::GameError,
    notifications::NotificationError,
    participants::RosterError,
};

use crate::jwt::AuthError;

#[derive(Debug)]
pub enum ServiceError {
    NotFound(String),
    Unauthorized(String),
    BadRequest(String),
    Forbidden(String),
    Conflict(String),
    Internal(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ServiceError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ServiceError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ServiceError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ServiceError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ServiceError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ServiceError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ServiceError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ServiceError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServiceError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ServiceError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ServiceError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = serde_json::json!({ "error": msg });
        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> ServiceError {
    ServiceError::Internal("Internal server error".to_string())
}

impl From<RegisterError> for ServiceError {
    fn from(e: RegisterError) -> Self {
        match e {
            RegisterError::InvalidInput(msg) => ServiceError::BadRequest(msg),
            RegisterError::EmailTaken => {
                ServiceError::BadRequest("Email already registered".to_string())
            }
            RegisterError::RepositoryError => internal(),
        }
    }
}

impl From<LoginError> for ServiceError {
    fn from(e: LoginError) -> Self {
        match e {
            LoginError::InvalidCredentials => {
                ServiceError::Unauthorized("Invalid credentials".to_string())
            }
            LoginError::RepositoryError => internal(),
        }
    }
}

impl From<AdminError> for ServiceError {
    fn from(e: AdminError) -> Self {
        match e {
            AdminError::Forbidden => ServiceError::Forbidden("Admin access required".to_string()),
            AdminError::NotFound => ServiceError::NotFound("User not found".to_string()),
            AdminError::CannotRemoveSelf => {
                ServiceError::BadRequest("Cannot delete yourself".to_string())
            }
            AdminError::RepositoryError => internal(),
        }
    }
}

impl From<GameError> for ServiceError {
    fn from(e: GameError) -> Self {
        match e {
            GameError::NotFound => ServiceError::NotFound("Game not found".to_string()),
            GameError::Forbidden => ServiceError::Forbidden("Admin access required".to_string()),
            GameError::InvalidInput(msg) => ServiceError::BadRequest(msg),
            GameError::RepositoryError => internal(),
        }
    }
}

impl From<RosterError> for ServiceError {
    fn from(e: RosterError) -> Self {
        let msg = e.to_string();
        match e {
            RosterError::NotFound => ServiceError::NotFound(msg),
            RosterError::Forbidden => ServiceError::Forbidden(msg),
            RosterError::AlreadyJoined | RosterError::InvalidTransition(_) => {
                ServiceError::BadRequest(msg)
            }
            RosterError::Contended => ServiceError::Conflict(msg),
            RosterError::Storage(e) => {
                log::error!("Roster storage failure: {}", e);
                internal()
            }
        }
    }
}

impl From<NotificationError> for ServiceError {
    fn from(e: NotificationError) -> Self {
        match e {
            NotificationError::NotFound => {
                ServiceError::NotFound("Notification not found".to_string())
            }
            NotificationError::RepositoryError => internal(),
        }
    }
}

impl From<AuthError> for ServiceError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingToken => ServiceError::Unauthorized("Missing token".to_string()),
            AuthError::InvalidToken => ServiceError::Unauthorized("Invalid token".to_string()),
            AuthError::TokenCreation => internal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_errors_map_to_status_codes() {
        let cases = [
            (RosterError::NotFound, StatusCode::NOT_FOUND),
            (RosterError::Forbidden, StatusCode::FORBIDDEN),
            (RosterError::AlreadyJoined, StatusCode::BAD_REQUEST),
            (RosterError::Contended, StatusCode::CONFLICT),
            (
                RosterError::Storage("disk full".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(ServiceError::from(error).into_response().status(), status);
        }
    }

    #[test]
    fn account_errors_map_to_status_codes() {
        assert_eq!(
            ServiceError::from(LoginError::InvalidCredentials)
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServiceError::from(AdminError::Forbidden)
                .into_response()
                .status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ServiceError::from(RegisterError::EmailTaken)
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
    }
}
