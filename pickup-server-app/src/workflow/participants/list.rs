use std::sync::Arc;

use crate::{
    domain::{
        GameId, RepoRetrieveError, account::UserRepository, participant::Participant,
        roster::RosterRepository,
    },
    workflow::participants::RosterError,
};

#[async_trait::async_trait]
pub trait ListParticipantsUseCase {
    /// Participants in join order. `user_games_played` is refreshed from the
    /// user record when it still exists.
    async fn list_participants(&self, game_id: GameId) -> Result<Vec<Participant>, RosterError>;
}

pub struct ListParticipantsUseCaseImpl<R: RosterRepository, U: UserRepository> {
    roster_repository: Arc<R>,
    user_repository: Arc<U>,
}

impl<R: RosterRepository, U: UserRepository> ListParticipantsUseCaseImpl<R, U> {
    pub fn new(roster_repository: Arc<R>, user_repository: Arc<U>) -> Self {
        Self {
            roster_repository,
            user_repository,
        }
    }
}

#[async_trait::async_trait]
impl<R, U> ListParticipantsUseCase for ListParticipantsUseCaseImpl<R, U>
where
    R: RosterRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    async fn list_participants(&self, game_id: GameId) -> Result<Vec<Participant>, RosterError> {
        let mut participants = self
            .roster_repository
            .list_participants(game_id)
            .await
            .map_err(|e| {
                log::error!("Failed to list participants of {}: {}", game_id, e);
                RosterError::Storage(e.to_string())
            })?;

        for participant in participants.iter_mut() {
            match self.user_repository.get_user(participant.user_id).await {
                Ok(user) => participant.user_games_played = user.games_played,
                Err(RepoRetrieveError::NotFound) => {}
                Err(RepoRetrieveError::StorageError(e)) => {
                    log::error!("Failed to load user {}: {}", participant.user_id, e);
                    return Err(RosterError::Storage(e));
                }
            }
        }
        Ok(participants)
    }
}
