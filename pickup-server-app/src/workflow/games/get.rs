use std::sync::Arc;

use crate::{
    domain::{
        GameId, RepoRetrieveError,
        account::UserRepository,
        game::GameRepository,
        roster::RosterRepository,
    },
    workflow::games::{GameError, GameView, view_with_counts},
};

#[async_trait::async_trait]
pub trait GetGameUseCase {
    async fn get_game(&self, game_id: GameId) -> Result<GameView, GameError>;
}

pub struct GetGameUseCaseImpl<G: GameRepository, R: RosterRepository, U: UserRepository> {
    game_repository: Arc<G>,
    roster_repository: Arc<R>,
    user_repository: Arc<U>,
}

impl<G: GameRepository, R: RosterRepository, U: UserRepository> GetGameUseCaseImpl<G, R, U> {
    pub fn new(
        game_repository: Arc<G>,
        roster_repository: Arc<R>,
        user_repository: Arc<U>,
    ) -> Self {
        Self {
            game_repository,
            roster_repository,
            user_repository,
        }
    }
}

#[async_trait::async_trait]
impl<G, R, U> GetGameUseCase for GetGameUseCaseImpl<G, R, U>
where
    G: GameRepository + Send + Sync + 'static,
    R: RosterRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    async fn get_game(&self, game_id: GameId) -> Result<GameView, GameError> {
        let game = match self.game_repository.get_game(game_id).await {
            Ok(game) => game,
            Err(RepoRetrieveError::NotFound) => return Err(GameError::NotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Failed to load game {}: {}", game_id, e);
                return Err(GameError::RepositoryError);
            }
        };

        let organiser_phone = match self.user_repository.get_user(game.organiser_id).await {
            Ok(organiser) => organiser.phone,
            Err(RepoRetrieveError::NotFound) => None,
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Failed to load organiser {}: {}", game.organiser_id, e);
                return Err(GameError::RepositoryError);
            }
        };

        let view = view_with_counts(self.roster_repository.as_ref(), game)
            .await
            .map_err(|e| {
                log::error!("Failed to count participants of {}: {}", game_id, e);
                GameError::RepositoryError
            })?;
        Ok(view.with_organiser_phone(organiser_phone))
    }
}
