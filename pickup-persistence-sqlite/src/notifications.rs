use pickup_server_app::domain::{
    NotificationId, RepoError, UserId,
    notification::{Notification, NotificationKind, NotificationRepository},
};
use sqlx::{Pool, Row, Sqlite, sqlite::SqliteRow};

use crate::{from_millis, parse_column};

pub struct SqliteNotificationRepository {
    pool: Pool<Sqlite>,
}

impl SqliteNotificationRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn notification_from_row(row: &SqliteRow) -> sqlx::Result<Notification> {
        let kind: &str = row.try_get("kind")?;
        let game_id: Option<&str> = row.try_get("game_id")?;
        Ok(Notification {
            id: parse_column(row.try_get("id")?)?,
            user_id: parse_column(row.try_get("user_id")?)?,
            kind: NotificationKind::parse(kind).ok_or_else(|| {
                sqlx::Error::Decode(format!("unknown notification kind {}", kind).into())
            })?,
            message: row.try_get("message")?,
            game_id: game_id.map(parse_column).transpose()?,
            player_name: row.try_get("player_name")?,
            read: row.try_get("read")?,
            created_at: from_millis(row.try_get("created_at")?)?,
        })
    }
}

#[async_trait::async_trait]
impl NotificationRepository for SqliteNotificationRepository {
    async fn list_notifications(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<Notification>, RepoError> {
        let rows = sqlx::query(
            "SELECT * FROM notifications WHERE user_id = ? ORDER BY created_at DESC, rowid DESC LIMIT ?",
        )
        .bind(user_id.to_string())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::StorageError(e.to_string()))?;
        rows.iter()
            .map(Self::notification_from_row)
            .collect::<sqlx::Result<Vec<_>>>()
            .map_err(|e| RepoError::StorageError(e.to_string()))
    }

    async fn mark_read(
        &self,
        notification_id: NotificationId,
        user_id: UserId,
    ) -> Result<bool, RepoError> {
        let result = sqlx::query("UPDATE notifications SET read = 1 WHERE id = ? AND user_id = ?")
            .bind(notification_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_unread(&self, user_id: UserId) -> Result<usize, RepoError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = ? AND read = 0")
                .bind(user_id.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Ok(count as usize)
    }
}
