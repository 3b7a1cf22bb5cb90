use std::sync::Arc;

use crate::{
    domain::{
        GameId, RepoRetrieveError, UserId,
        account::{AdministrationPolicy, UserRepository},
        game::GameRepository,
    },
    workflow::{
        account::{AdminError, require_admin},
        games::GameError,
    },
};

#[async_trait::async_trait]
pub trait DeleteGameUseCase {
    async fn delete_game(&self, requester: UserId, game_id: GameId) -> Result<(), GameError>;
}

pub struct DeleteGameUseCaseImpl<G: GameRepository, U: UserRepository, P: AdministrationPolicy> {
    game_repository: Arc<G>,
    user_repository: Arc<U>,
    admin_policy: Arc<P>,
}

impl<G: GameRepository, U: UserRepository, P: AdministrationPolicy>
    DeleteGameUseCaseImpl<G, U, P>
{
    pub fn new(game_repository: Arc<G>, user_repository: Arc<U>, admin_policy: Arc<P>) -> Self {
        Self {
            game_repository,
            user_repository,
            admin_policy,
        }
    }
}

#[async_trait::async_trait]
impl<G, U, P> DeleteGameUseCase for DeleteGameUseCaseImpl<G, U, P>
where
    G: GameRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: AdministrationPolicy + Send + Sync + 'static,
{
    async fn delete_game(&self, requester: UserId, game_id: GameId) -> Result<(), GameError> {
        require_admin(self.user_repository.as_ref(), self.admin_policy.as_ref(), requester)
            .await
            .map_err(|e| match e {
                AdminError::RepositoryError => GameError::RepositoryError,
                _ => GameError::Forbidden,
            })?;

        match self.game_repository.delete_game(game_id).await {
            Ok(()) => {
                log::info!("Admin {} deleted game {}", requester, game_id);
                Ok(())
            }
            Err(RepoRetrieveError::NotFound) => Err(GameError::NotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Failed to delete game {}: {}", game_id, e);
                Err(GameError::RepositoryError)
            }
        }
    }
}
