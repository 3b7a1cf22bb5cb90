use std::sync::Arc;

use crate::{
    domain::{
        ParticipantId, UserId, lifecycle::ParticipantLifecycleService,
        participant::ParticipantStatus, roster::RosterRepository,
    },
    workflow::participants::{RosterError, commit_with_retry, game_of_participant},
};

#[async_trait::async_trait]
pub trait ApproveParticipantUseCase {
    /// Confirms the participant if a slot is open, otherwise moves them to
    /// the reserve list. Returns the resulting status.
    async fn approve(
        &self,
        requester: UserId,
        participant_id: ParticipantId,
    ) -> Result<ParticipantStatus, RosterError>;
}

pub struct ApproveParticipantUseCaseImpl<R: RosterRepository, L: ParticipantLifecycleService> {
    roster_repository: Arc<R>,
    lifecycle: Arc<L>,
}

impl<R: RosterRepository, L: ParticipantLifecycleService> ApproveParticipantUseCaseImpl<R, L> {
    pub fn new(roster_repository: Arc<R>, lifecycle: Arc<L>) -> Self {
        Self {
            roster_repository,
            lifecycle,
        }
    }
}

#[async_trait::async_trait]
impl<R, L> ApproveParticipantUseCase for ApproveParticipantUseCaseImpl<R, L>
where
    R: RosterRepository + Send + Sync + 'static,
    L: ParticipantLifecycleService + Send + Sync + 'static,
{
    async fn approve(
        &self,
        requester: UserId,
        participant_id: ParticipantId,
    ) -> Result<ParticipantStatus, RosterError> {
        let game_id = game_of_participant(self.roster_repository.as_ref(), participant_id).await?;
        let status = commit_with_retry(self.roster_repository.as_ref(), game_id, |roster| {
            Ok(self.lifecycle.approve(roster, requester, participant_id)?)
        })
        .await?;

        log::info!(
            "Participant {} of game {} approved as {}",
            participant_id,
            game_id,
            status.as_str()
        );
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{
        domain::{
            capacity::{CapacityPolicy, CapacityServiceImpl},
            game::{Game, GameStatus},
            lifecycle::ParticipantLifecycleServiceImpl,
            participant::Participant,
        },
        testing::{InMemoryStore, game_by, user_named},
    };

    type TestApprove = ApproveParticipantUseCaseImpl<
        InMemoryStore,
        ParticipantLifecycleServiceImpl<CapacityServiceImpl>,
    >;

    fn use_case(store: Arc<InMemoryStore>) -> TestApprove {
        ApproveParticipantUseCaseImpl::new(
            store,
            Arc::new(ParticipantLifecycleServiceImpl::new(Arc::new(
                CapacityServiceImpl::new(CapacityPolicy::Unbounded),
            ))),
        )
    }

    fn requested(store: &InMemoryStore, game: &Game, name: &str) -> Participant {
        let participant = Participant::new(
            game.id,
            &user_named(name),
            ParticipantStatus::Requested,
            Utc::now(),
        );
        store.insert_participant(participant.clone());
        participant
    }

    #[tokio::test]
    async fn confirms_until_full_then_reserves() {
        let store = Arc::new(InMemoryStore::new());
        let organiser = user_named("Kyle");
        let game = game_by(&organiser, 1);
        store.insert_game(game.clone());
        let first = requested(&store, &game, "Sam");
        let second = requested(&store, &game, "Ali");
        let use_case = use_case(store.clone());

        assert_eq!(
            use_case.approve(organiser.id, first.id).await,
            Ok(ParticipantStatus::Confirmed)
        );
        let stored = store.game(game.id);
        assert_eq!(stored.players_needed, 0);
        assert_eq!(stored.status, GameStatus::Full);

        assert_eq!(
            use_case.approve(organiser.id, second.id).await,
            Ok(ParticipantStatus::Reserve)
        );
        assert_eq!(store.game(game.id).players_needed, 0);

        // Approving again changes nothing.
        let version = store.game(game.id).version;
        assert_eq!(
            use_case.approve(organiser.id, first.id).await,
            Ok(ParticipantStatus::Confirmed)
        );
        assert_eq!(store.game(game.id).version, version);
    }

    #[tokio::test]
    async fn only_the_organiser_may_approve() {
        let store = Arc::new(InMemoryStore::new());
        let organiser = user_named("Kyle");
        let game = game_by(&organiser, 1);
        store.insert_game(game.clone());
        let participant = requested(&store, &game, "Sam");
        let use_case = use_case(store.clone());

        assert_eq!(
            use_case.approve(participant.user_id, participant.id).await,
            Err(RosterError::Forbidden)
        );
        assert_eq!(
            use_case.approve(organiser.id, ParticipantId::new()).await,
            Err(RosterError::NotFound)
        );
        assert_eq!(store.game(game.id).players_needed, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_approvals_fill_one_slot_once() {
        let store = Arc::new(InMemoryStore::new());
        let organiser = user_named("Kyle");
        let game = game_by(&organiser, 1);
        store.insert_game(game.clone());
        let candidates: Vec<Participant> = ["Sam", "Ali", "Jo", "Max"]
            .iter()
            .map(|name| requested(&store, &game, name))
            .collect();
        let use_case = Arc::new(use_case(store.clone()));

        let handles: Vec<_> = candidates
            .iter()
            .map(|participant| {
                let use_case = use_case.clone();
                let participant_id = participant.id;
                let organiser_id = organiser.id;
                tokio::spawn(async move { use_case.approve(organiser_id, participant_id).await })
            })
            .collect();
        let mut confirmed = 0;
        for handle in handles {
            if handle.await.unwrap() == Ok(ParticipantStatus::Confirmed) {
                confirmed += 1;
            }
        }

        assert_eq!(confirmed, 1);
        let stored = store.game(game.id);
        assert_eq!(stored.players_needed, 0);
        assert_eq!(stored.status, GameStatus::Full);
        assert_eq!(
            store
                .participants(game.id)
                .iter()
                .filter(|p| p.status == ParticipantStatus::Confirmed)
                .count(),
            1
        );
    }
}
