use std::sync::Arc;

use crate::{
    domain::{RepoRetrieveError, UserId, game::GameRepository, roster::RosterRepository},
    workflow::games::{GameError, JoinedGameView},
};

#[async_trait::async_trait]
pub trait ListJoinedGamesUseCase {
    async fn list_joined_games(&self, user_id: UserId) -> Result<Vec<JoinedGameView>, GameError>;
}

pub struct ListJoinedGamesUseCaseImpl<G: GameRepository, R: RosterRepository> {
    game_repository: Arc<G>,
    roster_repository: Arc<R>,
}

impl<G: GameRepository, R: RosterRepository> ListJoinedGamesUseCaseImpl<G, R> {
    pub fn new(game_repository: Arc<G>, roster_repository: Arc<R>) -> Self {
        Self {
            game_repository,
            roster_repository,
        }
    }
}

#[async_trait::async_trait]
impl<G, R> ListJoinedGamesUseCase for ListJoinedGamesUseCaseImpl<G, R>
where
    G: GameRepository + Send + Sync + 'static,
    R: RosterRepository + Send + Sync + 'static,
{
    async fn list_joined_games(&self, user_id: UserId) -> Result<Vec<JoinedGameView>, GameError> {
        let participations = self
            .roster_repository
            .list_user_participations(user_id)
            .await
            .map_err(|e| {
                log::error!("Failed to list participations of {}: {}", user_id, e);
                GameError::RepositoryError
            })?;

        let mut joined = Vec::with_capacity(participations.len());
        for participation in participations {
            let game = match self.game_repository.get_game(participation.game_id).await {
                Ok(game) => game,
                // Deleted between the two reads.
                Err(RepoRetrieveError::NotFound) => continue,
                Err(RepoRetrieveError::StorageError(e)) => {
                    log::error!("Failed to load game {}: {}", participation.game_id, e);
                    return Err(GameError::RepositoryError);
                }
            };
            joined.push(JoinedGameView {
                game_id: game.id,
                venue: game.venue,
                scheduled_at: game.scheduled_at,
                format: game.format,
                players_needed: game.players_needed,
                organiser_name: game.organiser_name,
                status: participation.status,
            });
        }
        joined.sort_by_key(|g| g.scheduled_at);
        Ok(joined)
    }
}
