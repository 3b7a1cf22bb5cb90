use pickup_server_app::domain::{
    GameId, ParticipantId, RepoError, RepoRetrieveError, UserId,
    game::{Game, GameQuery, GameRepository, GameStatus},
    notification::Notification,
    participant::{Participant, ParticipantStatus},
    roster::{ParticipantChange, Roster, RosterChange, RosterCommitError, RosterRepository},
};
use sqlx::{Pool, Row, Sqlite, SqliteConnection, sqlite::SqliteRow};

use crate::{from_millis, is_unique_violation, parse_column, to_millis};

/// Games and their rosters. Roster commits are compare-and-swap on
/// `games.version`.
pub struct SqliteGameRepository {
    pool: Pool<Sqlite>,
}

impl SqliteGameRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn game_from_row(row: &SqliteRow) -> sqlx::Result<Game> {
        let status: &str = row.try_get("status")?;
        let version: i64 = row.try_get("version")?;
        Ok(Game {
            id: parse_column(row.try_get("id")?)?,
            organiser_id: parse_column(row.try_get("organiser_id")?)?,
            organiser_name: row.try_get("organiser_name")?,
            venue: row.try_get("venue")?,
            scheduled_at: from_millis(row.try_get("scheduled_at")?)?,
            format: parse_column(row.try_get("format")?)?,
            subs: row.try_get("subs")?,
            notes: row.try_get("notes")?,
            players_requested: row.try_get("players_requested")?,
            players_needed: row.try_get("players_needed")?,
            status: GameStatus::parse(status).ok_or_else(|| {
                sqlx::Error::Decode(format!("unknown game status {}", status).into())
            })?,
            version: version as u64,
            created_at: from_millis(row.try_get("created_at")?)?,
        })
    }

    fn participant_from_row(row: &SqliteRow) -> sqlx::Result<Participant> {
        let status: &str = row.try_get("status")?;
        Ok(Participant {
            id: parse_column(row.try_get("id")?)?,
            game_id: parse_column(row.try_get("game_id")?)?,
            user_id: parse_column(row.try_get("user_id")?)?,
            user_name: row.try_get("user_name")?,
            user_area: row.try_get("user_area")?,
            user_phone: row.try_get("user_phone")?,
            user_games_played: row.try_get("user_games_played")?,
            status: ParticipantStatus::parse(status).ok_or_else(|| {
                sqlx::Error::Decode(format!("unknown participant status {}", status).into())
            })?,
            joined_at: from_millis(row.try_get("joined_at")?)?,
        })
    }

    async fn fetch_participants(
        &self,
        column: &str,
        id: String,
    ) -> sqlx::Result<Vec<Participant>> {
        let rows = sqlx::query(&format!(
            "SELECT * FROM participants WHERE {} = ? ORDER BY joined_at, rowid",
            column
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::participant_from_row).collect()
    }

    async fn apply_participant_change(
        conn: &mut SqliteConnection,
        change: &ParticipantChange,
    ) -> Result<(), RosterCommitError> {
        let result = match change {
            ParticipantChange::Insert(p) => sqlx::query(
                "INSERT INTO participants (id, game_id, user_id, user_name, user_area, user_phone, user_games_played, status, joined_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(p.id.to_string())
            .bind(p.game_id.to_string())
            .bind(p.user_id.to_string())
            .bind(&p.user_name)
            .bind(&p.user_area)
            .bind(&p.user_phone)
            .bind(p.user_games_played)
            .bind(p.status.as_str())
            .bind(to_millis(p.joined_at))
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    RosterCommitError::Duplicate
                } else {
                    RosterCommitError::StorageError(e.to_string())
                }
            })?,
            ParticipantChange::SetStatus {
                participant_id,
                from,
                to,
            } => sqlx::query("UPDATE participants SET status = ? WHERE id = ? AND status = ?")
                .bind(to.as_str())
                .bind(participant_id.to_string())
                .bind(from.as_str())
                .execute(&mut *conn)
                .await
                .map_err(storage_error)?,
            ParticipantChange::Remove { participant_id } => {
                sqlx::query("DELETE FROM participants WHERE id = ?")
                    .bind(participant_id.to_string())
                    .execute(&mut *conn)
                    .await
                    .map_err(storage_error)?
            }
        };

        if result.rows_affected() == 0 {
            return Err(RosterCommitError::Conflict);
        }
        Ok(())
    }

    async fn insert_notification(
        conn: &mut SqliteConnection,
        notification: &Notification,
    ) -> Result<(), RosterCommitError> {
        sqlx::query(
            "INSERT INTO notifications (id, user_id, kind, message, game_id, player_name, read, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(notification.id.to_string())
        .bind(notification.user_id.to_string())
        .bind(notification.kind.as_str())
        .bind(&notification.message)
        .bind(notification.game_id.map(|id| id.to_string()))
        .bind(&notification.player_name)
        .bind(notification.read)
        .bind(to_millis(notification.created_at))
        .execute(&mut *conn)
        .await
        .map_err(storage_error)?;
        Ok(())
    }
}

fn storage_error(e: sqlx::Error) -> RosterCommitError {
    RosterCommitError::StorageError(e.to_string())
}

#[async_trait::async_trait]
impl GameRepository for SqliteGameRepository {
    async fn create_game(&self, game: Game) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO games (id, organiser_id, organiser_name, venue, scheduled_at, format, subs, notes, players_requested, players_needed, status, version, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(game.id.to_string())
        .bind(game.organiser_id.to_string())
        .bind(&game.organiser_name)
        .bind(&game.venue)
        .bind(to_millis(game.scheduled_at))
        .bind(game.format.to_string())
        .bind(game.subs)
        .bind(&game.notes)
        .bind(game.players_requested)
        .bind(game.players_needed)
        .bind(game.status.as_str())
        .bind(game.version as i64)
        .bind(to_millis(game.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Ok(())
    }

    async fn get_game(&self, game_id: GameId) -> Result<Game, RepoRetrieveError> {
        let row = sqlx::query("SELECT * FROM games WHERE id = ?")
            .bind(game_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?
            .ok_or(RepoRetrieveError::NotFound)?;
        Self::game_from_row(&row).map_err(|e| RepoRetrieveError::StorageError(e.to_string()))
    }

    async fn list_games(&self, query: GameQuery) -> Result<Vec<Game>, RepoError> {
        let mut conditions = Vec::new();
        let mut binds = Vec::new();
        if let Some(organiser) = query.organiser {
            conditions.push("organiser_id = ?".to_string());
            binds.push(organiser.to_string());
        }
        if let Some(ids) = &query.ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            conditions.push(format!(
                "id IN ({})",
                ids.iter().map(|_| "?").collect::<Vec<_>>().join(", ")
            ));
            binds.extend(ids.iter().map(|id| id.to_string()));
        }

        let mut sql = "SELECT * FROM games".to_string();
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY scheduled_at, rowid");

        let mut statement = sqlx::query(&sql);
        for bind in binds {
            statement = statement.bind(bind);
        }
        let rows = statement
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        rows.iter()
            .map(Self::game_from_row)
            .collect::<sqlx::Result<Vec<_>>>()
            .map_err(|e| RepoError::StorageError(e.to_string()))
    }

    async fn delete_game(&self, game_id: GameId) -> Result<(), RepoRetrieveError> {
        let result = sqlx::query("DELETE FROM games WHERE id = ?")
            .bind(game_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(RepoRetrieveError::NotFound);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RosterRepository for SqliteGameRepository {
    async fn load_roster(&self, game_id: GameId) -> Result<Roster, RepoRetrieveError> {
        // Both reads inside one transaction see the same snapshot.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?;

        let row = sqlx::query("SELECT * FROM games WHERE id = ?")
            .bind(game_id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?
            .ok_or(RepoRetrieveError::NotFound)?;
        let game =
            Self::game_from_row(&row).map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?;

        let participants = sqlx::query(
            "SELECT * FROM participants WHERE game_id = ? ORDER BY joined_at, rowid",
        )
        .bind(game_id.to_string())
        .fetch_all(&mut *tx)
        .await
        .and_then(|rows| {
            rows.iter()
                .map(Self::participant_from_row)
                .collect::<sqlx::Result<Vec<_>>>()
        })
        .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?;
        Ok(Roster { game, participants })
    }

    async fn get_participant(
        &self,
        participant_id: ParticipantId,
    ) -> Result<Participant, RepoRetrieveError> {
        let row = sqlx::query("SELECT * FROM participants WHERE id = ?")
            .bind(participant_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?
            .ok_or(RepoRetrieveError::NotFound)?;
        Self::participant_from_row(&row)
            .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))
    }

    async fn list_participants(&self, game_id: GameId) -> Result<Vec<Participant>, RepoError> {
        self.fetch_participants("game_id", game_id.to_string())
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))
    }

    async fn list_user_participations(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Participant>, RepoError> {
        self.fetch_participants("user_id", user_id.to_string())
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))
    }

    async fn commit(&self, change: RosterChange) -> Result<(), RosterCommitError> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let result = match change.capacity {
            Some(capacity) => sqlx::query(
                "UPDATE games SET players_needed = ?, status = ?, version = version + 1 WHERE id = ? AND version = ?",
            )
            .bind(capacity.players_needed())
            .bind(capacity.status().as_str())
            .bind(change.game_id.to_string())
            .bind(change.expected_version as i64),
            None => sqlx::query("UPDATE games SET version = version + 1 WHERE id = ? AND version = ?")
                .bind(change.game_id.to_string())
                .bind(change.expected_version as i64),
        }
        .execute(&mut *tx)
        .await
        .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            let exists = sqlx::query("SELECT 1 FROM games WHERE id = ?")
                .bind(change.game_id.to_string())
                .fetch_optional(&mut *tx)
                .await
                .map_err(storage_error)?
                .is_some();
            return Err(if exists {
                RosterCommitError::Conflict
            } else {
                RosterCommitError::NotFound
            });
        }

        // Dropping `tx` on any error below rolls the whole change back.
        for participant_change in &change.participants {
            Self::apply_participant_change(&mut tx, participant_change).await?;
        }
        for notification in &change.notifications {
            Self::insert_notification(&mut tx, notification).await?;
        }

        tx.commit().await.map_err(storage_error)
    }
}
