use std::sync::Arc;

use crate::{
    domain::{
        UserId,
        account::{AdministrationPolicy, UserRepository},
    },
    workflow::account::{AdminError, UserSummary, require_admin},
};

#[async_trait::async_trait]
pub trait ListUsersUseCase {
    async fn list_users(&self, requester: UserId) -> Result<Vec<UserSummary>, AdminError>;
}

pub struct ListUsersUseCaseImpl<U: UserRepository, P: AdministrationPolicy> {
    user_repository: Arc<U>,
    admin_policy: Arc<P>,
}

impl<U: UserRepository, P: AdministrationPolicy> ListUsersUseCaseImpl<U, P> {
    pub fn new(user_repository: Arc<U>, admin_policy: Arc<P>) -> Self {
        Self {
            user_repository,
            admin_policy,
        }
    }
}

#[async_trait::async_trait]
impl<U, P> ListUsersUseCase for ListUsersUseCaseImpl<U, P>
where
    U: UserRepository + Send + Sync + 'static,
    P: AdministrationPolicy + Send + Sync + 'static,
{
    async fn list_users(&self, requester: UserId) -> Result<Vec<UserSummary>, AdminError> {
        require_admin(self.user_repository.as_ref(), self.admin_policy.as_ref(), requester)
            .await?;

        let mut users = self.user_repository.list_users().await.map_err(|e| {
            log::error!("Failed to list users: {}", e);
            AdminError::RepositoryError
        })?;
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users.into_iter().map(UserSummary::from).collect())
    }
}
