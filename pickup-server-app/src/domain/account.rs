use chrono::{DateTime, Utc};

use crate::domain::{RepoCreateError, RepoError, RepoRetrieveError, UserId};

#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub area: Option<String>,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub games_played: u32,
    pub games_confirmed: u32,
    pub no_shows: u32,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        name: String,
        email: String,
        password_hash: String,
        area: Option<String>,
        bio: Option<String>,
        phone: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::new(),
            name,
            email,
            password_hash,
            area,
            bio,
            phone,
            games_played: 0,
            games_confirmed: 0,
            no_shows: 0,
            created_at,
        }
    }
}

#[async_trait::async_trait]
pub trait UserRepository {
    async fn create_user(&self, user: User) -> Result<(), RepoCreateError>;
    async fn get_user(&self, user_id: UserId) -> Result<User, RepoRetrieveError>;
    async fn get_user_by_email(&self, email: &str) -> Result<User, RepoRetrieveError>;
    async fn list_users(&self) -> Result<Vec<User>, RepoError>;
    /// Removes the user together with their participations, the games they
    /// organise and every participant of those games.
    async fn remove_user(&self, user_id: UserId) -> Result<(), RepoRetrieveError>;
}

pub trait AdministrationPolicy {
    fn is_admin(&self, user: &User) -> bool;
}

pub struct AdminEmailPolicy {
    admin_email: String,
}

impl AdminEmailPolicy {
    pub fn new(admin_email: impl Into<String>) -> Self {
        Self {
            admin_email: admin_email.into(),
        }
    }
}

impl AdministrationPolicy for AdminEmailPolicy {
    fn is_admin(&self, user: &User) -> bool {
        user.email == self.admin_email
    }
}
