use thiserror::Error;

use crate::domain::{
    GameId, ParticipantId, RepoRetrieveError,
    lifecycle::LifecycleError,
    participant::ParticipantStatus,
    roster::{Roster, RosterChange, RosterCommitError, RosterRepository},
};

pub mod approve;
pub mod decline;
pub mod join;
pub mod list;
pub mod remove;
pub mod withdraw;

/// Attempts per operation before giving up on a busy game.
pub const MAX_COMMIT_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RosterError {
    #[error("not found")]
    NotFound,
    #[error("only the organiser can do that")]
    Forbidden,
    #[error("already joined this game")]
    AlreadyJoined,
    #[error("not possible for a {} participant", .0.as_str())]
    InvalidTransition(ParticipantStatus),
    #[error("game is busy, try again")]
    Contended,
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<LifecycleError> for RosterError {
    fn from(e: LifecycleError) -> Self {
        match e {
            LifecycleError::ParticipantNotFound => RosterError::NotFound,
            LifecycleError::Forbidden => RosterError::Forbidden,
            LifecycleError::AlreadyJoined => RosterError::AlreadyJoined,
            LifecycleError::InvalidTransition(status) => RosterError::InvalidTransition(status),
        }
    }
}

impl From<RepoRetrieveError> for RosterError {
    fn from(e: RepoRetrieveError) -> Self {
        match e {
            RepoRetrieveError::NotFound => RosterError::NotFound,
            RepoRetrieveError::StorageError(e) => RosterError::Storage(e),
        }
    }
}

/// Loads the roster of `game_id`, plans a change with `plan` and commits it.
/// A version conflict reloads and re-plans, up to [`MAX_COMMIT_ATTEMPTS`]
/// times. Empty plans are not committed.
pub(crate) async fn commit_with_retry<R, T, F>(
    roster_repository: &R,
    game_id: GameId,
    mut plan: F,
) -> Result<T, RosterError>
where
    R: RosterRepository + Sync + ?Sized,
    T: Send,
    F: FnMut(&Roster) -> Result<(RosterChange, T), RosterError> + Send,
{
    for attempt in 1..=MAX_COMMIT_ATTEMPTS {
        let roster = roster_repository.load_roster(game_id).await?;
        let (change, outcome) = plan(&roster)?;
        if change.is_empty() {
            return Ok(outcome);
        }

        match roster_repository.commit(change).await {
            Ok(()) => return Ok(outcome),
            Err(RosterCommitError::Conflict) => {
                log::debug!(
                    "Roster of game {} changed during attempt {}, retrying",
                    game_id,
                    attempt
                );
            }
            Err(RosterCommitError::Duplicate) => return Err(RosterError::AlreadyJoined),
            Err(RosterCommitError::NotFound) => return Err(RosterError::NotFound),
            Err(RosterCommitError::StorageError(e)) => {
                log::error!("Failed to commit roster of game {}: {}", game_id, e);
                return Err(RosterError::Storage(e));
            }
        }
    }

    log::warn!(
        "Giving up on game {} after {} conflicting commits",
        game_id,
        MAX_COMMIT_ATTEMPTS
    );
    Err(RosterError::Contended)
}

/// Game a participant belongs to.
pub(crate) async fn game_of_participant<R>(
    roster_repository: &R,
    participant_id: ParticipantId,
) -> Result<GameId, RosterError>
where
    R: RosterRepository + ?Sized,
{
    let participant = roster_repository.get_participant(participant_id).await?;
    Ok(participant.game_id)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;
    use crate::{
        domain::{
            capacity::{CapacityPolicy, CapacityServiceImpl},
            lifecycle::{ParticipantLifecycleService, ParticipantLifecycleServiceImpl},
            participant::JoinAction,
        },
        testing::{InMemoryStore, game_by, user_named},
    };

    fn lifecycle() -> ParticipantLifecycleServiceImpl<CapacityServiceImpl> {
        ParticipantLifecycleServiceImpl::new(Arc::new(CapacityServiceImpl::new(
            CapacityPolicy::Unbounded,
        )))
    }

    #[tokio::test]
    async fn replans_after_a_conflict() {
        let store = InMemoryStore::new();
        let organiser = user_named("Kyle");
        let player = user_named("Sam");
        let game = game_by(&organiser, 2);
        store.insert_game(game.clone());
        store.interfere_with_next_commit();

        let service = lifecycle();
        let participant = commit_with_retry(&store, game.id, |roster| {
            Ok(service.join(roster, &player, JoinAction::Request, Utc::now())?)
        })
        .await
        .unwrap();

        assert_eq!(store.commit_attempts(), 2);
        assert_eq!(store.participants(game.id), vec![participant]);
        // One bump from the interfering writer, one from our commit.
        assert_eq!(store.game(game.id).version, 2);
    }

    #[tokio::test]
    async fn gives_up_when_always_contended() {
        let store = InMemoryStore::new();
        let organiser = user_named("Kyle");
        let game = game_by(&organiser, 2);
        store.insert_game(game.clone());
        store.conflict_forever();

        let service = lifecycle();
        let result = commit_with_retry(&store, game.id, |roster| {
            Ok(service.join(roster, &user_named("Sam"), JoinAction::Reserve, Utc::now())?)
        })
        .await;

        assert_eq!(result, Err(RosterError::Contended));
        assert_eq!(store.commit_attempts(), MAX_COMMIT_ATTEMPTS);
        assert!(store.participants(game.id).is_empty());
    }

    #[tokio::test]
    async fn skips_empty_changes() {
        let store = InMemoryStore::new();
        let game = game_by(&user_named("Kyle"), 2);
        store.insert_game(game.clone());

        let outcome = commit_with_retry(&store, game.id, |roster| {
            Ok((RosterChange::for_game(&roster.game), 7))
        })
        .await;

        assert_eq!(outcome, Ok(7));
        assert_eq!(store.commit_attempts(), 0);
        assert_eq!(
            commit_with_retry(&store, GameId::new(), |roster| Ok((
                RosterChange::for_game(&roster.game),
                ()
            )))
            .await,
            Err(RosterError::NotFound)
        );
    }
}
