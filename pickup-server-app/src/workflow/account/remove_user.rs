use std::sync::Arc;

use crate::{
    domain::{
        RepoRetrieveError, UserId,
        account::{AdministrationPolicy, UserRepository},
    },
    workflow::account::{AdminError, require_admin},
};

#[async_trait::async_trait]
pub trait RemoveUserUseCase {
    async fn remove_user(&self, requester: UserId, target: UserId) -> Result<(), AdminError>;
}

pub struct RemoveUserUseCaseImpl<U: UserRepository, P: AdministrationPolicy> {
    user_repository: Arc<U>,
    admin_policy: Arc<P>,
}

impl<U: UserRepository, P: AdministrationPolicy> RemoveUserUseCaseImpl<U, P> {
    pub fn new(user_repository: Arc<U>, admin_policy: Arc<P>) -> Self {
        Self {
            user_repository,
            admin_policy,
        }
    }
}

#[async_trait::async_trait]
impl<U, P> RemoveUserUseCase for RemoveUserUseCaseImpl<U, P>
where
    U: UserRepository + Send + Sync + 'static,
    P: AdministrationPolicy + Send + Sync + 'static,
{
    async fn remove_user(&self, requester: UserId, target: UserId) -> Result<(), AdminError> {
        require_admin(self.user_repository.as_ref(), self.admin_policy.as_ref(), requester)
            .await?;
        if requester == target {
            return Err(AdminError::CannotRemoveSelf);
        }

        match self.user_repository.remove_user(target).await {
            Ok(()) => {
                log::info!("Admin {} removed user {}", requester, target);
                Ok(())
            }
            Err(RepoRetrieveError::NotFound) => Err(AdminError::NotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Failed to remove user {}: {}", target, e);
                Err(AdminError::RepositoryError)
            }
        }
    }
}
