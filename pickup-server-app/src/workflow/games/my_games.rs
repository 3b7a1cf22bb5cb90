use std::{collections::HashSet, sync::Arc};

use crate::{
    domain::{
        GameId, RepoError, UserId,
        game::{GameQuery, GameRepository},
        roster::RosterRepository,
    },
    workflow::games::{GameError, GameView, views_with_counts},
};

#[async_trait::async_trait]
pub trait ListMyGamesUseCase {
    /// Games the user organises or takes part in, earliest first.
    async fn list_my_games(&self, user_id: UserId) -> Result<Vec<GameView>, GameError>;
}

pub struct ListMyGamesUseCaseImpl<G: GameRepository, R: RosterRepository> {
    game_repository: Arc<G>,
    roster_repository: Arc<R>,
}

impl<G: GameRepository, R: RosterRepository> ListMyGamesUseCaseImpl<G, R> {
    pub fn new(game_repository: Arc<G>, roster_repository: Arc<R>) -> Self {
        Self {
            game_repository,
            roster_repository,
        }
    }
}

#[async_trait::async_trait]
impl<G, R> ListMyGamesUseCase for ListMyGamesUseCaseImpl<G, R>
where
    G: GameRepository + Send + Sync + 'static,
    R: RosterRepository + Send + Sync + 'static,
{
    async fn list_my_games(&self, user_id: UserId) -> Result<Vec<GameView>, GameError> {
        let storage_error = |e: RepoError| {
            log::error!("Failed to list games of user {}: {}", user_id, e);
            GameError::RepositoryError
        };

        let mut games = self
            .game_repository
            .list_games(GameQuery::new().with_organiser(user_id))
            .await
            .map_err(storage_error)?;

        let joined_ids: Vec<GameId> = self
            .roster_repository
            .list_user_participations(user_id)
            .await
            .map_err(storage_error)?
            .into_iter()
            .map(|p| p.game_id)
            .collect();
        if !joined_ids.is_empty() {
            games.extend(
                self.game_repository
                    .list_games(GameQuery::new().with_ids(joined_ids))
                    .await
                    .map_err(storage_error)?,
            );
        }

        let mut seen = HashSet::new();
        games.retain(|g| seen.insert(g.id));
        games.sort_by_key(|g| g.scheduled_at);

        views_with_counts(self.roster_repository.as_ref(), games).await
    }
}
