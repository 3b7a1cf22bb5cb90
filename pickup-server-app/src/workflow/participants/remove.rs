use std::sync::Arc;

use crate::{
    domain::{
        ParticipantId, UserId, lifecycle::ParticipantLifecycleService, roster::RosterRepository,
    },
    workflow::participants::{RosterError, commit_with_retry, game_of_participant},
};

#[async_trait::async_trait]
pub trait RemoveParticipantUseCase {
    /// Organiser removal. A confirmed player's slot is reopened; reserves are
    /// not promoted.
    async fn remove(
        &self,
        requester: UserId,
        participant_id: ParticipantId,
    ) -> Result<(), RosterError>;
}

pub struct RemoveParticipantUseCaseImpl<R: RosterRepository, L: ParticipantLifecycleService> {
    roster_repository: Arc<R>,
    lifecycle: Arc<L>,
}

impl<R: RosterRepository, L: ParticipantLifecycleService> RemoveParticipantUseCaseImpl<R, L> {
    pub fn new(roster_repository: Arc<R>, lifecycle: Arc<L>) -> Self {
        Self {
            roster_repository,
            lifecycle,
        }
    }
}

#[async_trait::async_trait]
impl<R, L> RemoveParticipantUseCase for RemoveParticipantUseCaseImpl<R, L>
where
    R: RosterRepository + Send + Sync + 'static,
    L: ParticipantLifecycleService + Send + Sync + 'static,
{
    async fn remove(
        &self,
        requester: UserId,
        participant_id: ParticipantId,
    ) -> Result<(), RosterError> {
        let game_id = game_of_participant(self.roster_repository.as_ref(), participant_id).await?;
        commit_with_retry(self.roster_repository.as_ref(), game_id, |roster| {
            Ok((self.lifecycle.remove(roster, requester, participant_id)?, ()))
        })
        .await?;

        log::info!(
            "Organiser {} removed participant {} from game {}",
            requester,
            participant_id,
            game_id
        );
        Ok(())
    }
}
