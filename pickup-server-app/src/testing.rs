use std::sync::{
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use chrono::{Duration, Utc};

use crate::domain::{
    GameId, NotificationId, ParticipantId, RepoCreateError, RepoError, RepoRetrieveError, UserId,
    account::{User, UserRepository},
    game::{Game, GameDetails, GameFormat, GameQuery, GameRepository},
    notification::{Notification, NotificationRepository},
    participant::Participant,
    roster::{ParticipantChange, Roster, RosterChange, RosterCommitError, RosterRepository},
};

pub fn user_named(name: &str) -> User {
    User::new(
        name.to_string(),
        format!("{}@example.com", name.to_lowercase()),
        String::new(),
        Some("Arnold".to_string()),
        None,
        Some("07700900000".to_string()),
        Utc::now(),
    )
}

pub fn game_by(organiser: &User, players_needed: u32) -> Game {
    Game::new(
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
    )
}

pub fn apply_change(roster: &mut Roster, change: &RosterChange) {
    if let Some(capacity) = change.capacity {
        roster.game.players_needed = capacity.players_needed();
        roster.game.status = capacity.status();
    }
    for participant_change in &change.participants {
        apply_participant_change(&mut roster.participants, participant_change);
    }
    roster.game.version += 1;
}

fn apply_participant_change(participants: &mut Vec<Participant>, change: &ParticipantChange) {
    match change {
        ParticipantChange::Insert(participant) => participants.push(participant.clone()),
        ParticipantChange::SetStatus {
            participant_id, to, ..
        } => {
            if let Some(p) = participants.iter_mut().find(|p| p.id == *participant_id) {
                p.status = *to;
            }
        }
        ParticipantChange::Remove { participant_id } => {
            participants.retain(|p| p.id != *participant_id)
        }
    }
}

#[derive(Default)]
struct StoreState {
    users: Vec<User>,
    games: Vec<Game>,
    participants: Vec<Participant>,
    notifications: Vec<Notification>,
}

/// Repository double holding everything in one mutex. Commits follow the same
/// compare-and-swap rules as the sqlite adapter.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
    interfere_next_commit: AtomicBool,
    always_conflict: AtomicBool,
    commit_attempts: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, user: User) {
        self.state.lock().unwrap().users.push(user);
    }

    pub fn insert_game(&self, game: Game) {
        self.state.lock().unwrap().games.push(game);
    }

    pub fn insert_participant(&self, participant: Participant) {
        self.state.lock().unwrap().participants.push(participant);
    }

    pub fn game(&self, game_id: GameId) -> Game {
        let state = self.state.lock().unwrap();
        state
            .games
            .iter()
            .find(|g| g.id == game_id)
            .cloned()
            .expect("game exists")
    }

    pub fn participants(&self, game_id: GameId) -> Vec<Participant> {
        let state = self.state.lock().unwrap();
        state
            .participants
            .iter()
            .filter(|p| p.game_id == game_id)
            .cloned()
            .collect()
    }

    pub fn notifications_for(&self, user_id: UserId) -> Vec<Notification> {
        let state = self.state.lock().unwrap();
        state
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }

    /// The next commit behaves as if another request committed first.
    pub fn interfere_with_next_commit(&self) {
        self.interfere_next_commit.store(true, Ordering::SeqCst);
    }

    pub fn conflict_forever(&self) {
        self.always_conflict.store(true, Ordering::SeqCst);
    }

    pub fn commit_attempts(&self) -> usize {
        self.commit_attempts.load(Ordering::SeqCst)
    }
}

fn check_participant_change(
    participants: &[Participant],
    game_id: GameId,
    change: &ParticipantChange,
) -> Result<(), RosterCommitError> {
    match change {
        ParticipantChange::Insert(new) => {
            if participants
                .iter()
                .any(|p| p.game_id == game_id && p.user_id == new.user_id)
            {
                return Err(RosterCommitError::Duplicate);
            }
        }
        ParticipantChange::SetStatus {
            participant_id,
            from,
            ..
        } => {
            if !participants
                .iter()
                .any(|p| p.id == *participant_id && p.status == *from)
            {
                return Err(RosterCommitError::Conflict);
            }
        }
        ParticipantChange::Remove { participant_id } => {
            if !participants.iter().any(|p| p.id == *participant_id) {
                return Err(RosterCommitError::Conflict);
            }
        }
    }
    Ok(())
}

#[async_trait::async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(&self, user: User) -> Result<(), RepoCreateError> {
        let mut state = self.state.lock().unwrap();
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(RepoCreateError::Conflict);
        }
        state.users.push(user);
        Ok(())
    }

    async fn get_user(&self, user_id: UserId) -> Result<User, RepoRetrieveError> {
        let state = self.state.lock().unwrap();
        state
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, RepoRetrieveError> {
        let state = self.state.lock().unwrap();
        state
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn list_users(&self) -> Result<Vec<User>, RepoError> {
        Ok(self.state.lock().unwrap().users.clone())
    }

    async fn remove_user(&self, user_id: UserId) -> Result<(), RepoRetrieveError> {
        let mut state = self.state.lock().unwrap();
        if !state.users.iter().any(|u| u.id == user_id) {
            return Err(RepoRetrieveError::NotFound);
        }
        let organised: Vec<GameId> = state
            .games
            .iter()
            .filter(|g| g.organiser_id == user_id)
            .map(|g| g.id)
            .collect();
        state
            .participants
            .retain(|p| p.user_id != user_id && !organised.contains(&p.game_id));
        state.games.retain(|g| g.organiser_id != user_id);
        state.users.retain(|u| u.id != user_id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl GameRepository for InMemoryStore {
    async fn create_game(&self, game: Game) -> Result<(), RepoError> {
        self.state.lock().unwrap().games.push(game);
        Ok(())
    }

    async fn get_game(&self, game_id: GameId) -> Result<Game, RepoRetrieveError> {
        let state = self.state.lock().unwrap();
        state
            .games
            .iter()
            .find(|g| g.id == game_id)
            .cloned()
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn list_games(&self, query: GameQuery) -> Result<Vec<Game>, RepoError> {
        let state = self.state.lock().unwrap();
        let mut games: Vec<Game> = state
            .games
            .iter()
            .filter(|g| query.organiser.is_none_or(|o| g.organiser_id == o))
            .filter(|g| query.ids.as_ref().is_none_or(|ids| ids.contains(&g.id)))
            .cloned()
            .collect();
        games.sort_by_key(|g| g.scheduled_at);
        Ok(games)
    }

    async fn delete_game(&self, game_id: GameId) -> Result<(), RepoRetrieveError> {
        let mut state = self.state.lock().unwrap();
        if !state.games.iter().any(|g| g.id == game_id) {
            return Err(RepoRetrieveError::NotFound);
        }
        state.games.retain(|g| g.id != game_id);
        state.participants.retain(|p| p.game_id != game_id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl RosterRepository for InMemoryStore {
    async fn load_roster(&self, game_id: GameId) -> Result<Roster, RepoRetrieveError> {
        let state = self.state.lock().unwrap();
        let game = state
            .games
            .iter()
            .find(|g| g.id == game_id)
            .cloned()
            .ok_or(RepoRetrieveError::NotFound)?;
        let participants = state
            .participants
            .iter()
            .filter(|p| p.game_id == game_id)
            .cloned()
            .collect();
        Ok(Roster { game, participants })
    }

    async fn get_participant(
        &self,
        participant_id: ParticipantId,
    ) -> Result<Participant, RepoRetrieveError> {
        let state = self.state.lock().unwrap();
        state
            .participants
            .iter()
            .find(|p| p.id == participant_id)
            .cloned()
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn list_participants(&self, game_id: GameId) -> Result<Vec<Participant>, RepoError> {
        Ok(self.participants(game_id))
    }

    async fn list_user_participations(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Participant>, RepoError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .participants
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn commit(&self, change: RosterChange) -> Result<(), RosterCommitError> {
        self.commit_attempts.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        let state = &mut *state;

        let game = state
            .games
            .iter_mut()
            .find(|g| g.id == change.game_id)
            .ok_or(RosterCommitError::NotFound)?;

        if self.always_conflict.load(Ordering::SeqCst)
            || self.interfere_next_commit.swap(false, Ordering::SeqCst)
        {
            game.version += 1;
            return Err(RosterCommitError::Conflict);
        }
        if game.version != change.expected_version {
            return Err(RosterCommitError::Conflict);
        }
        for participant_change in &change.participants {
            check_participant_change(&state.participants, change.game_id, participant_change)?;
        }

        if let Some(capacity) = change.capacity {
            game.players_needed = capacity.players_needed();
            game.status = capacity.status();
        }
        game.version += 1;
        for participant_change in &change.participants {
            apply_participant_change(&mut state.participants, participant_change);
        }
        state.notifications.extend(change.notifications);
        Ok(())
    }
}

#[async_trait::async_trait]
impl NotificationRepository for InMemoryStore {
    async fn list_notifications(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<Notification>, RepoError> {
        let mut notifications = self.notifications_for(user_id);
        notifications.reverse();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        notifications.truncate(limit);
        Ok(notifications)
    }

    async fn mark_read(
        &self,
        notification_id: NotificationId,
        user_id: UserId,
    ) -> Result<bool, RepoError> {
        let mut state = self.state.lock().unwrap();
        match state
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id && n.user_id == user_id)
        {
            Some(notification) => {
                notification.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_unread(&self, user_id: UserId) -> Result<usize, RepoError> {
        Ok(self
            .notifications_for(user_id)
            .iter()
            .filter(|n| !n.read)
            .count())
    }
}
