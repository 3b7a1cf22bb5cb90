use std::sync::Arc;

use chrono::Utc;

use crate::{
    domain::{
        GameId, UserId,
        account::UserRepository,
        lifecycle::ParticipantLifecycleService,
        participant::{JoinAction, Participant},
        roster::RosterRepository,
    },
    workflow::participants::{RosterError, commit_with_retry},
};

#[async_trait::async_trait]
pub trait JoinGameUseCase {
    async fn join_game(
        &self,
        user_id: UserId,
        game_id: GameId,
        action: JoinAction,
    ) -> Result<Participant, RosterError>;
}

pub struct JoinGameUseCaseImpl<R: RosterRepository, U: UserRepository, L: ParticipantLifecycleService>
{
    roster_repository: Arc<R>,
    user_repository: Arc<U>,
    lifecycle: Arc<L>,
}

impl<R: RosterRepository, U: UserRepository, L: ParticipantLifecycleService>
    JoinGameUseCaseImpl<R, U, L>
{
    pub fn new(roster_repository: Arc<R>, user_repository: Arc<U>, lifecycle: Arc<L>) -> Self {
        Self {
            roster_repository,
            user_repository,
            lifecycle,
        }
    }
}

#[async_trait::async_trait]
impl<R, U, L> JoinGameUseCase for JoinGameUseCaseImpl<R, U, L>
where
    R: RosterRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    L: ParticipantLifecycleService + Send + Sync + 'static,
{
    async fn join_game(
        &self,
        user_id: UserId,
        game_id: GameId,
        action: JoinAction,
    ) -> Result<Participant, RosterError> {
        let user = self.user_repository.get_user(user_id).await?;
        let participant = commit_with_retry(self.roster_repository.as_ref(), game_id, |roster| {
            Ok(self.lifecycle.join(roster, &user, action, Utc::now())?)
        })
        .await?;

        log::info!(
            "User {} joined game {} as {}",
            user_id,
            game_id,
            participant.status.as_str()
        );
        Ok(participant)
    }
}
