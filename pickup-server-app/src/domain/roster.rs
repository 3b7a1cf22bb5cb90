use crate::domain::{
    GameId, ParticipantId, RepoError, RepoRetrieveError, UserId,
    capacity::Capacity,
    game::Game,
    notification::Notification,
    participant::{Participant, ParticipantStatus},
};

/// Consistent snapshot of a game and its participants, in join order.
#[derive(Clone, Debug)]
pub struct Roster {
    pub game: Game,
    pub participants: Vec<Participant>,
}

impl Roster {
    pub fn participant(&self, participant_id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == participant_id)
    }

    pub fn participant_of_user(&self, user_id: UserId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.user_id == user_id)
    }

    /// Earliest-joined reserve, excluding `except`.
    pub fn first_reserve(&self, except: ParticipantId) -> Option<&Participant> {
        self.participants
            .iter()
            .filter(|p| p.id != except && p.status == ParticipantStatus::Reserve)
            .min_by_key(|p| p.joined_at)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ParticipantChange {
    Insert(Participant),
    SetStatus {
        participant_id: ParticipantId,
        from: ParticipantStatus,
        to: ParticipantStatus,
    },
    Remove {
        participant_id: ParticipantId,
    },
}

/// A set of writes applied to one game in a single transaction, only if the
/// game's version still equals `expected_version`. A successful commit bumps
/// the version.
#[derive(Clone, Debug, PartialEq)]
pub struct RosterChange {
    pub game_id: GameId,
    pub expected_version: u64,
    pub capacity: Option<Capacity>,
    pub participants: Vec<ParticipantChange>,
    pub notifications: Vec<Notification>,
}

impl RosterChange {
    pub fn for_game(game: &Game) -> Self {
        Self {
            game_id: game.id,
            expected_version: game.version,
            capacity: None,
            participants: Vec::new(),
            notifications: Vec::new(),
        }
    }

    pub fn with_capacity(mut self, capacity: Capacity) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn with_participant(mut self, change: ParticipantChange) -> Self {
        self.participants.push(change);
        self
    }

    pub fn with_notification(mut self, notification: Notification) -> Self {
        self.notifications.push(notification);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.capacity.is_none() && self.participants.is_empty() && self.notifications.is_empty()
    }
}

#[derive(Debug)]
pub enum RosterCommitError {
    /// The game changed since the snapshot was taken.
    Conflict,
    /// A participant for the same (game, user) pair already exists.
    Duplicate,
    NotFound,
    StorageError(String),
}

impl std::fmt::Display for RosterCommitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterCommitError::Conflict => write!(f, "Roster changed concurrently"),
            RosterCommitError::Duplicate => write!(f, "Participant already exists"),
            RosterCommitError::NotFound => write!(f, "Game not found"),
            RosterCommitError::StorageError(e) => write!(f, "Storage error: {}", e),
        }
    }
}

#[async_trait::async_trait]
pub trait RosterRepository {
    async fn load_roster(&self, game_id: GameId) -> Result<Roster, RepoRetrieveError>;
    async fn get_participant(
        &self,
        participant_id: ParticipantId,
    ) -> Result<Participant, RepoRetrieveError>;
    /// Participants of a game in join order.
    async fn list_participants(&self, game_id: GameId) -> Result<Vec<Participant>, RepoError>;
    async fn list_user_participations(&self, user_id: UserId)
    -> Result<Vec<Participant>, RepoError>;
    async fn commit(&self, change: RosterChange) -> Result<(), RosterCommitError>;
}
