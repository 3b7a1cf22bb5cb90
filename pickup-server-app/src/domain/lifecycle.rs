use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{
    ParticipantId, UserId,
    account::User,
    capacity::{CapacityExhausted, CapacityService},
    notification::{Notification, NotificationKind},
    participant::{JoinAction, Participant, ParticipantStatus},
    roster::{ParticipantChange, Roster, RosterChange},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    ParticipantNotFound,
    Forbidden,
    AlreadyJoined,
    InvalidTransition(ParticipantStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawOutcome {
    pub was_confirmed: bool,
    pub promoted: Option<ParticipantId>,
}

/// Plans participant transitions against a roster snapshot. Nothing is
/// written here; every method returns the [`RosterChange`] to commit.
pub trait ParticipantLifecycleService {
    fn join(
        &self,
        roster: &Roster,
        user: &User,
        action: JoinAction,
        now: DateTime<Utc>,
    ) -> Result<(RosterChange, Participant), LifecycleError>;
    fn approve(
        &self,
        roster: &Roster,
        requester: UserId,
        participant_id: ParticipantId,
    ) -> Result<(RosterChange, ParticipantStatus), LifecycleError>;
    fn decline(
        &self,
        roster: &Roster,
        requester: UserId,
        participant_id: ParticipantId,
    ) -> Result<RosterChange, LifecycleError>;
    fn remove(
        &self,
        roster: &Roster,
        requester: UserId,
        participant_id: ParticipantId,
    ) -> Result<RosterChange, LifecycleError>;
    fn withdraw(
        &self,
        roster: &Roster,
        user_id: UserId,
        player_name: &str,
        now: DateTime<Utc>,
    ) -> Result<(RosterChange, WithdrawOutcome), LifecycleError>;
}

pub struct ParticipantLifecycleServiceImpl<C: CapacityService> {
    capacity_service: Arc<C>,
}

impl<C: CapacityService> ParticipantLifecycleServiceImpl<C> {
    pub fn new(capacity_service: Arc<C>) -> Self {
        Self { capacity_service }
    }

    fn organiser_target<'a>(
        roster: &'a Roster,
        requester: UserId,
        participant_id: ParticipantId,
    ) -> Result<&'a Participant, LifecycleError> {
        let participant = roster
            .participant(participant_id)
            .ok_or(LifecycleError::ParticipantNotFound)?;
        if !roster.game.is_organised_by(requester) {
            return Err(LifecycleError::Forbidden);
        }
        Ok(participant)
    }
}

impl<C: CapacityService> ParticipantLifecycleService for ParticipantLifecycleServiceImpl<C> {
    fn join(
        &self,
        roster: &Roster,
        user: &User,
        action: JoinAction,
        now: DateTime<Utc>,
    ) -> Result<(RosterChange, Participant), LifecycleError> {
        if roster.participant_of_user(user.id).is_some() {
            return Err(LifecycleError::AlreadyJoined);
        }

        let game = &roster.game;
        let participant = Participant::new(game.id, user, action.initial_status(), now);
        let (kind, message) = match action {
            JoinAction::Request => (
                NotificationKind::NewRequest,
                format!("{} wants to join {}", user.name, game.venue),
            ),
            JoinAction::Reserve => (
                NotificationKind::NewReserve,
                format!("{} joined reserve for {}", user.name, game.venue),
            ),
        };
        let notification = Notification::new(
            game.organiser_id,
            kind,
            message,
            Some(game.id),
            Some(user.name.clone()),
            now,
        );

        let change = RosterChange::for_game(game)
            .with_participant(ParticipantChange::Insert(participant.clone()))
            .with_notification(notification);
        Ok((change, participant))
    }

    fn approve(
        &self,
        roster: &Roster,
        requester: UserId,
        participant_id: ParticipantId,
    ) -> Result<(RosterChange, ParticipantStatus), LifecycleError> {
        let participant = Self::organiser_target(roster, requester, participant_id)?;
        let change = RosterChange::for_game(&roster.game);

        if participant.status == ParticipantStatus::Confirmed {
            return Ok((change, ParticipantStatus::Confirmed));
        }

        let (change, status) = match self.capacity_service.reserve_slot(&roster.game) {
            Ok(capacity) => (
                change.with_capacity(capacity),
                ParticipantStatus::Confirmed,
            ),
            Err(CapacityExhausted) => (change, ParticipantStatus::Reserve),
        };

        if status == participant.status {
            return Ok((change, status));
        }

        let change = change.with_participant(ParticipantChange::SetStatus {
            participant_id,
            from: participant.status,
            to: status,
        });
        Ok((change, status))
    }

    fn decline(
        &self,
        roster: &Roster,
        requester: UserId,
        participant_id: ParticipantId,
    ) -> Result<RosterChange, LifecycleError> {
        let participant = Self::organiser_target(roster, requester, participant_id)?;
        if participant.status == ParticipantStatus::Confirmed {
            return Err(LifecycleError::InvalidTransition(participant.status));
        }
        Ok(RosterChange::for_game(&roster.game)
            .with_participant(ParticipantChange::Remove { participant_id }))
    }

    fn remove(
        &self,
        roster: &Roster,
        requester: UserId,
        participant_id: ParticipantId,
    ) -> Result<RosterChange, LifecycleError> {
        let participant = Self::organiser_target(roster, requester, participant_id)?;
        let mut change = RosterChange::for_game(&roster.game);
        if participant.status == ParticipantStatus::Confirmed {
            change = change.with_capacity(self.capacity_service.release_slot(&roster.game));
        }
        Ok(change.with_participant(ParticipantChange::Remove { participant_id }))
    }

    fn withdraw(
        &self,
        roster: &Roster,
        user_id: UserId,
        player_name: &str,
        now: DateTime<Utc>,
    ) -> Result<(RosterChange, WithdrawOutcome), LifecycleError> {
        let game = &roster.game;
        let participant = roster
            .participant_of_user(user_id)
            .ok_or(LifecycleError::ParticipantNotFound)?;
        let was_confirmed = participant.status == ParticipantStatus::Confirmed;

        let mut change = RosterChange::for_game(game).with_participant(ParticipantChange::Remove {
            participant_id: participant.id,
        });
        let mut promoted = None;

        if was_confirmed {
            match roster.first_reserve(participant.id) {
                Some(reserve) => {
                    promoted = Some(reserve.id);
                    change = change
                        .with_participant(ParticipantChange::SetStatus {
                            participant_id: reserve.id,
                            from: ParticipantStatus::Reserve,
                            to: ParticipantStatus::Confirmed,
                        })
                        .with_notification(Notification::new(
                            reserve.user_id,
                            NotificationKind::Promoted,
                            format!("You've been promoted to confirmed for {}!", game.venue),
                            Some(game.id),
                            None,
                            now,
                        ));
                }
                None => {
                    change = change.with_capacity(self.capacity_service.release_slot(game));
                }
            }
        }

        let change = change.with_notification(Notification::new(
            game.organiser_id,
            NotificationKind::PlayerWithdrew,
            format!("{} can't make it for {}", player_name, game.venue),
            Some(game.id),
            Some(player_name.to_string()),
            now,
        ));

        Ok((
            change,
            WithdrawOutcome {
                was_confirmed,
                promoted,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::{
        domain::{
            capacity::{CapacityPolicy, CapacityServiceImpl},
            game::{Game, GameDetails, GameFormat, GameStatus},
        },
        testing::{apply_change, user_named},
    };

    fn lifecycle() -> ParticipantLifecycleServiceImpl<CapacityServiceImpl> {
        ParticipantLifecycleServiceImpl::new(Arc::new(CapacityServiceImpl::new(
            CapacityPolicy::Unbounded,
        )))
    }

    fn roster_needing(organiser: &User, players_needed: u32) -> Roster {
        Roster {
            game: Game::new(
                organiser.id,
                organiser.name.clone(),
                GameDetails {
                    venue: "Goals Arnold".to_string(),
                    scheduled_at: Utc::now() + Duration::days(1),
                    format: GameFormat::FiveASide,
                    subs: None,
                    notes: None,
                    players_needed,
                },
                Utc::now(),
            ),
            participants: Vec::new(),
        }
    }

    fn join(
        service: &impl ParticipantLifecycleService,
        roster: &mut Roster,
        user: &User,
        action: JoinAction,
    ) -> ParticipantId {
        let (change, participant) = service.join(roster, user, action, Utc::now()).unwrap();
        apply_change(roster, &change);
        participant.id
    }

    fn status_of(roster: &Roster, id: ParticipantId) -> Option<ParticipantStatus> {
        roster.participant(id).map(|p| p.status)
    }

    #[test]
    fn join_notifies_the_organiser() {
        let service = lifecycle();
        let organiser = user_named("Kyle");
        let player = user_named("Sam");
        let roster = roster_needing(&organiser, 2);

        let (change, participant) = service
            .join(&roster, &player, JoinAction::Request, Utc::now())
            .unwrap();
        assert_eq!(participant.status, ParticipantStatus::Requested);
        assert_eq!(change.capacity, None);
        assert_eq!(change.notifications.len(), 1);
        assert_eq!(change.notifications[0].user_id, organiser.id);
        assert_eq!(change.notifications[0].kind, NotificationKind::NewRequest);
        assert_eq!(change.notifications[0].message, "Sam wants to join Goals Arnold");

        let (change, participant) = service
            .join(&roster, &player, JoinAction::Reserve, Utc::now())
            .unwrap();
        assert_eq!(participant.status, ParticipantStatus::Reserve);
        assert_eq!(change.notifications[0].kind, NotificationKind::NewReserve);
        assert_eq!(
            change.notifications[0].message,
            "Sam joined reserve for Goals Arnold"
        );
    }

    #[test]
    fn joining_twice_is_rejected() {
        let service = lifecycle();
        let organiser = user_named("Kyle");
        let player = user_named("Sam");
        let mut roster = roster_needing(&organiser, 2);

        join(&service, &mut roster, &player, JoinAction::Request);
        let result = service.join(&roster, &player, JoinAction::Reserve, Utc::now());
        assert_eq!(result.err(), Some(LifecycleError::AlreadyJoined));
    }

    #[test]
    fn approve_confirms_while_slots_remain_then_reserves() {
        let service = lifecycle();
        let organiser = user_named("Kyle");
        let a = user_named("A");
        let b = user_named("B");
        let mut roster = roster_needing(&organiser, 1);
        let a_id = join(&service, &mut roster, &a, JoinAction::Request);
        let b_id = join(&service, &mut roster, &b, JoinAction::Request);

        let (change, status) = service.approve(&roster, organiser.id, a_id).unwrap();
        assert_eq!(status, ParticipantStatus::Confirmed);
        apply_change(&mut roster, &change);
        assert_eq!(roster.game.players_needed, 0);
        assert_eq!(roster.game.status, GameStatus::Full);

        let (change, status) = service.approve(&roster, organiser.id, b_id).unwrap();
        assert_eq!(status, ParticipantStatus::Reserve);
        assert_eq!(change.capacity, None);
        apply_change(&mut roster, &change);
        assert_eq!(roster.game.players_needed, 0);
        assert_eq!(status_of(&roster, b_id), Some(ParticipantStatus::Reserve));
    }

    #[test]
    fn approving_a_confirmed_player_changes_nothing() {
        let service = lifecycle();
        let organiser = user_named("Kyle");
        let a = user_named("A");
        let mut roster = roster_needing(&organiser, 2);
        let a_id = join(&service, &mut roster, &a, JoinAction::Request);
        let (change, _) = service.approve(&roster, organiser.id, a_id).unwrap();
        apply_change(&mut roster, &change);

        let (change, status) = service.approve(&roster, organiser.id, a_id).unwrap();
        assert_eq!(status, ParticipantStatus::Confirmed);
        assert!(change.is_empty());
    }

    #[test]
    fn organiser_only_operations_reject_other_users() {
        let service = lifecycle();
        let organiser = user_named("Kyle");
        let a = user_named("A");
        let mut roster = roster_needing(&organiser, 2);
        let a_id = join(&service, &mut roster, &a, JoinAction::Request);

        assert_eq!(
            service.approve(&roster, a.id, a_id).err(),
            Some(LifecycleError::Forbidden)
        );
        assert_eq!(
            service.decline(&roster, a.id, a_id).err(),
            Some(LifecycleError::Forbidden)
        );
        assert_eq!(
            service.remove(&roster, a.id, a_id).err(),
            Some(LifecycleError::Forbidden)
        );
    }

    #[test]
    fn unknown_participant_is_not_found() {
        let service = lifecycle();
        let organiser = user_named("Kyle");
        let roster = roster_needing(&organiser, 2);

        assert_eq!(
            service
                .remove(&roster, organiser.id, ParticipantId::new())
                .err(),
            Some(LifecycleError::ParticipantNotFound)
        );
        assert_eq!(
            service
                .withdraw(&roster, organiser.id, "Kyle", Utc::now())
                .err(),
            Some(LifecycleError::ParticipantNotFound)
        );
    }

    #[test]
    fn decline_deletes_without_touching_capacity() {
        let service = lifecycle();
        let organiser = user_named("Kyle");
        let a = user_named("A");
        let mut roster = roster_needing(&organiser, 2);
        let a_id = join(&service, &mut roster, &a, JoinAction::Request);

        let change = service.decline(&roster, organiser.id, a_id).unwrap();
        assert_eq!(change.capacity, None);
        apply_change(&mut roster, &change);
        assert!(roster.participant(a_id).is_none());
        assert_eq!(roster.game.players_needed, 2);
    }

    #[test]
    fn declining_a_confirmed_player_is_invalid() {
        let service = lifecycle();
        let organiser = user_named("Kyle");
        let a = user_named("A");
        let mut roster = roster_needing(&organiser, 2);
        let a_id = join(&service, &mut roster, &a, JoinAction::Request);
        let (change, _) = service.approve(&roster, organiser.id, a_id).unwrap();
        apply_change(&mut roster, &change);

        assert_eq!(
            service.decline(&roster, organiser.id, a_id).err(),
            Some(LifecycleError::InvalidTransition(
                ParticipantStatus::Confirmed
            ))
        );
    }

    #[test]
    fn removing_a_confirmed_player_reopens_without_promotion() {
        let service = lifecycle();
        let organiser = user_named("Kyle");
        let a = user_named("A");
        let b = user_named("B");
        let mut roster = roster_needing(&organiser, 1);
        let a_id = join(&service, &mut roster, &a, JoinAction::Request);
        let b_id = join(&service, &mut roster, &b, JoinAction::Reserve);
        let (change, _) = service.approve(&roster, organiser.id, a_id).unwrap();
        apply_change(&mut roster, &change);

        let change = service.remove(&roster, organiser.id, a_id).unwrap();
        assert!(change.notifications.is_empty());
        apply_change(&mut roster, &change);
        assert_eq!(roster.game.players_needed, 1);
        assert_eq!(roster.game.status, GameStatus::Open);
        assert_eq!(status_of(&roster, b_id), Some(ParticipantStatus::Reserve));
    }

    #[test]
    fn removing_a_requested_player_keeps_capacity() {
        let service = lifecycle();
        let organiser = user_named("Kyle");
        let a = user_named("A");
        let mut roster = roster_needing(&organiser, 1);
        let a_id = join(&service, &mut roster, &a, JoinAction::Request);

        let change = service.remove(&roster, organiser.id, a_id).unwrap();
        assert_eq!(change.capacity, None);
    }

    #[test]
    fn withdrawal_promotes_the_earliest_reserve() {
        let service = lifecycle();
        let organiser = user_named("Kyle");
        let a = user_named("A");
        let b = user_named("B");
        let c = user_named("C");
        let mut roster = roster_needing(&organiser, 1);
        let a_id = join(&service, &mut roster, &a, JoinAction::Request);
        let b_id = join(&service, &mut roster, &b, JoinAction::Reserve);
        let c_id = join(&service, &mut roster, &c, JoinAction::Reserve);
        let (change, _) = service.approve(&roster, organiser.id, a_id).unwrap();
        apply_change(&mut roster, &change);

        let (change, outcome) = service
            .withdraw(&roster, a.id, &a.name, Utc::now())
            .unwrap();
        assert_eq!(
            outcome,
            WithdrawOutcome {
                was_confirmed: true,
                promoted: Some(b_id)
            }
        );
        assert_eq!(change.capacity, None);

        let kinds: Vec<_> = change.notifications.iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![NotificationKind::Promoted, NotificationKind::PlayerWithdrew]
        );
        assert_eq!(change.notifications[0].user_id, b.id);
        assert_eq!(change.notifications[1].user_id, organiser.id);
        assert_eq!(change.notifications[1].message, "A can't make it for Goals Arnold");

        apply_change(&mut roster, &change);
        assert!(roster.participant(a_id).is_none());
        assert_eq!(status_of(&roster, b_id), Some(ParticipantStatus::Confirmed));
        assert_eq!(status_of(&roster, c_id), Some(ParticipantStatus::Reserve));
        assert_eq!(roster.game.players_needed, 0);
        assert_eq!(roster.game.status, GameStatus::Full);
    }

    #[test]
    fn withdrawal_without_reserves_releases_the_slot() {
        let service = lifecycle();
        let organiser = user_named("Kyle");
        let a = user_named("A");
        let mut roster = roster_needing(&organiser, 1);
        let a_id = join(&service, &mut roster, &a, JoinAction::Request);
        let (change, _) = service.approve(&roster, organiser.id, a_id).unwrap();
        apply_change(&mut roster, &change);

        let (change, outcome) = service
            .withdraw(&roster, a.id, &a.name, Utc::now())
            .unwrap();
        assert!(outcome.was_confirmed);
        assert_eq!(outcome.promoted, None);
        apply_change(&mut roster, &change);
        assert_eq!(roster.game.players_needed, 1);
        assert_eq!(roster.game.status, GameStatus::Open);
    }

    #[test]
    fn withdrawal_of_an_unconfirmed_player_only_notifies() {
        let service = lifecycle();
        let organiser = user_named("Kyle");
        let a = user_named("A");
        let b = user_named("B");
        let mut roster = roster_needing(&organiser, 1);
        join(&service, &mut roster, &a, JoinAction::Request);
        let b_id = join(&service, &mut roster, &b, JoinAction::Reserve);

        let (change, outcome) = service
            .withdraw(&roster, a.id, &a.name, Utc::now())
            .unwrap();
        assert!(!outcome.was_confirmed);
        assert_eq!(change.capacity, None);
        assert_eq!(change.notifications.len(), 1);
        assert_eq!(
            change.notifications[0].kind,
            NotificationKind::PlayerWithdrew
        );
        apply_change(&mut roster, &change);
        assert_eq!(status_of(&roster, b_id), Some(ParticipantStatus::Reserve));
    }
}
