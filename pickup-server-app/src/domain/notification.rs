use chrono::{DateTime, Utc};

use crate::domain::{GameId, NotificationId, RepoError, UserId};

pub const NOTIFICATION_PAGE_SIZE: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    NewRequest,
    NewReserve,
    Promoted,
    PlayerWithdrew,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::NewRequest => "NEW_REQUEST",
            NotificationKind::NewReserve => "NEW_RESERVE",
            NotificationKind::Promoted => "PROMOTED",
            NotificationKind::PlayerWithdrew => "PLAYER_WITHDREW",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NEW_REQUEST" => Some(NotificationKind::NewRequest),
            "NEW_RESERVE" => Some(NotificationKind::NewReserve),
            "PROMOTED" => Some(NotificationKind::Promoted),
            "PLAYER_WITHDREW" => Some(NotificationKind::PlayerWithdrew),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub message: String,
    pub game_id: Option<GameId>,
    pub player_name: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        user_id: UserId,
        kind: NotificationKind,
        message: String,
        game_id: Option<GameId>,
        player_name: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            user_id,
            kind,
            message,
            game_id,
            player_name,
            read: false,
            created_at,
        }
    }
}

/// Notifications are appended as part of roster commits; this port covers
/// the reading side and the read flag.
#[async_trait::async_trait]
pub trait NotificationRepository {
    /// Newest first.
    async fn list_notifications(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<Notification>, RepoError>;
    /// Returns whether a notification owned by `user_id` was found.
    async fn mark_read(
        &self,
        notification_id: NotificationId,
        user_id: UserId,
    ) -> Result<bool, RepoError>;
    async fn count_unread(&self, user_id: UserId) -> Result<usize, RepoError>;
}
