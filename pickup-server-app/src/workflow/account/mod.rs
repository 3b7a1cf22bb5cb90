use chrono::{DateTime, Utc};

use crate::domain::{
    RepoRetrieveError, UserId,
    account::{AdministrationPolicy, User, UserRepository},
};

pub mod list_users;
pub mod login;
pub mod register;
pub mod remove_user;

#[derive(Debug, Clone, PartialEq)]
pub struct AccountView {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub area: Option<String>,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub is_admin: bool,
    pub games_played: u32,
}

impl AccountView {
    pub fn new(user: &User, is_admin: bool) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            area: user.area.clone(),
            bio: user.bio.clone(),
            phone: user.phone.clone(),
            is_admin,
            games_played: user.games_played,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub area: Option<String>,
    pub bio: Option<String>,
    pub games_played: u32,
    pub games_confirmed: u32,
    pub no_shows: u32,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
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

#[derive(Debug, PartialEq)]
pub enum AdminError {
    Forbidden,
    NotFound,
    CannotRemoveSelf,
    RepositoryError,
}

pub(crate) async fn require_admin<U, P>(
    user_repository: &U,
    policy: &P,
    requester: UserId,
) -> Result<User, AdminError>
where
    U: UserRepository + ?Sized,
    P: AdministrationPolicy + ?Sized,
{
    match user_repository.get_user(requester).await {
        Ok(user) if policy.is_admin(&user) => Ok(user),
        Ok(_) | Err(RepoRetrieveError::NotFound) => Err(AdminError::Forbidden),
        Err(RepoRetrieveError::StorageError(e)) => {
            log::error!("Failed to load requesting user {}: {}", requester, e);
            Err(AdminError::RepositoryError)
        }
    }
}
