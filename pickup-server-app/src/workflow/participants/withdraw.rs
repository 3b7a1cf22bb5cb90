use std::sync::Arc;

use chrono::Utc;

use crate::{
    domain::{
        GameId, RepoRetrieveError, UserId,
        account::UserRepository,
        lifecycle::{ParticipantLifecycleService, WithdrawOutcome},
        roster::RosterRepository,
    },
    workflow::participants::{RosterError, commit_with_retry},
};

/// Name used in the organiser's notification when the user record is gone.
pub const UNKNOWN_PLAYER_NAME: &str = "A player";

#[async_trait::async_trait]
pub trait WithdrawUseCase {
    async fn withdraw(
        &self,
        user_id: UserId,
        game_id: GameId,
    ) -> Result<WithdrawOutcome, RosterError>;
}

pub struct WithdrawUseCaseImpl<R: RosterRepository, U: UserRepository, L: ParticipantLifecycleService>
{
    roster_repository: Arc<R>,
    user_repository: Arc<U>,
    lifecycle: Arc<L>,
}

impl<R: RosterRepository, U: UserRepository, L: ParticipantLifecycleService>
    WithdrawUseCaseImpl<R, U, L>
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
impl<R, U, L> WithdrawUseCase for WithdrawUseCaseImpl<R, U, L>
where
    R: RosterRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    L: ParticipantLifecycleService + Send + Sync + 'static,
{
    async fn withdraw(
        &self,
        user_id: UserId,
        game_id: GameId,
    ) -> Result<WithdrawOutcome, RosterError> {
        let player_name = match self.user_repository.get_user(user_id).await {
            Ok(user) => user.name,
            Err(RepoRetrieveError::NotFound) => UNKNOWN_PLAYER_NAME.to_string(),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Failed to load user {}: {}", user_id, e);
                return Err(RosterError::Storage(e));
            }
        };

        let outcome = commit_with_retry(self.roster_repository.as_ref(), game_id, |roster| {
            Ok(self
                .lifecycle
                .withdraw(roster, user_id, &player_name, Utc::now())?)
        })
        .await?;

        match outcome.promoted {
            Some(promoted) => log::info!(
                "User {} withdrew from game {}, promoted {}",
                user_id,
                game_id,
                promoted
            ),
            None => log::info!("User {} withdrew from game {}", user_id, game_id),
        }
        Ok(outcome)
    }
}
