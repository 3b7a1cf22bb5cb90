use std::sync::Arc;

use crate::{
    domain::{
        game::{GameQuery, GameRepository},
        roster::RosterRepository,
    },
    workflow::games::{GameError, GameView, views_with_counts},
};

#[async_trait::async_trait]
pub trait ListGamesUseCase {
    async fn list_games(&self) -> Result<Vec<GameView>, GameError>;
}

pub struct ListGamesUseCaseImpl<G: GameRepository, R: RosterRepository> {
    game_repository: Arc<G>,
    roster_repository: Arc<R>,
}

impl<G: GameRepository, R: RosterRepository> ListGamesUseCaseImpl<G, R> {
    pub fn new(game_repository: Arc<G>, roster_repository: Arc<R>) -> Self {
        Self {
            game_repository,
            roster_repository,
        }
    }
}

#[async_trait::async_trait]
impl<G, R> ListGamesUseCase for ListGamesUseCaseImpl<G, R>
where
    G: GameRepository + Send + Sync + 'static,
    R: RosterRepository + Send + Sync + 'static,
{
    async fn list_games(&self) -> Result<Vec<GameView>, GameError> {
        let games = self
            .game_repository
            .list_games(GameQuery::new())
            .await
            .map_err(|e| {
                log::error!("Failed to list games: {}", e);
                GameError::RepositoryError
            })?;
        views_with_counts(self.roster_repository.as_ref(), games).await
    }
}
