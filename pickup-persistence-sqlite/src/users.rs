use pickup_server_app::domain::{
    RepoCreateError, RepoError, RepoRetrieveError, UserId,
    account::{User, UserRepository},
};
use sqlx::{Pool, Row, Sqlite, sqlite::SqliteRow};

use crate::{from_millis, is_unique_violation, parse_column, to_millis};

pub struct SqliteUserRepository {
    pool: Pool<Sqlite>,
}

impl SqliteUserRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    fn user_from_row(row: &SqliteRow) -> sqlx::Result<User> {
        Ok(User {
            id: parse_column(row.try_get("id")?)?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            area: row.try_get("area")?,
            bio: row.try_get("bio")?,
            phone: row.try_get("phone")?,
            games_played: row.try_get("games_played")?,
            games_confirmed: row.try_get("games_confirmed")?,
            no_shows: row.try_get("no_shows")?,
            created_at: from_millis(row.try_get("created_at")?)?,
        })
    }

    async fn find_user(&self, column: &str, value: String) -> Result<User, RepoRetrieveError> {
        let row = sqlx::query(&format!("SELECT * FROM users WHERE {} = ?", column))
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?
            .ok_or(RepoRetrieveError::NotFound)?;
        Self::user_from_row(&row).map_err(|e| RepoRetrieveError::StorageError(e.to_string()))
    }
}

#[async_trait::async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create_user(&self, user: User) -> Result<(), RepoCreateError> {
        let fields = [
            "id",
            "name",
            "email",
            "password_hash",
            "area",
            "bio",
            "phone",
            "games_played",
            "games_confirmed",
            "no_shows",
            "created_at",
        ];

        sqlx::query(&format!(
            "INSERT INTO users ({}) VALUES ({})",
            fields.join(", "),
            fields.iter().map(|_| "?").collect::<Vec<_>>().join(", ")
        ))
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.area)
        .bind(&user.bio)
        .bind(&user.phone)
        .bind(user.games_played)
        .bind(user.games_confirmed)
        .bind(user.no_shows)
        .bind(to_millis(user.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepoCreateError::Conflict
            } else {
                RepoCreateError::StorageError(e.to_string())
            }
        })?;
        Ok(())
    }

    async fn get_user(&self, user_id: UserId) -> Result<User, RepoRetrieveError> {
        self.find_user("id", user_id.to_string()).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, RepoRetrieveError> {
        self.find_user("email", email.to_string()).await
    }

    async fn list_users(&self) -> Result<Vec<User>, RepoError> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY created_at")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        rows.iter()
            .map(Self::user_from_row)
            .collect::<sqlx::Result<Vec<_>>>()
            .map_err(|e| RepoError::StorageError(e.to_string()))
    }

    async fn remove_user(&self, user_id: UserId) -> Result<(), RepoRetrieveError> {
        // Participations, organised games and their rosters cascade.
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(RepoRetrieveError::NotFound);
        }
        Ok(())
    }
}
