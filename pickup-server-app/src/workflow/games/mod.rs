use chrono::{DateTime, Utc};

use crate::domain::{
    GameId, RepoError, UserId,
    game::{Game, GameFormat, GameStatus},
    participant::{ParticipantCounts, ParticipantStatus},
    roster::RosterRepository,
};

pub mod create;
pub mod delete;
pub mod get;
pub mod joined;
pub mod list;
pub mod my_games;

#[derive(Debug, Clone, PartialEq)]
pub struct GameView {
    pub id: GameId,
    pub organiser_id: UserId,
    pub organiser_name: String,
    pub organiser_phone: Option<String>,
    pub venue: String,
    pub scheduled_at: DateTime<Utc>,
    pub format: GameFormat,
    pub subs: Option<f64>,
    pub notes: Option<String>,
    pub players_needed: u32,
    pub status: GameStatus,
    pub confirmed_count: usize,
    pub reserve_count: usize,
}

impl GameView {
    pub fn new(game: Game, counts: ParticipantCounts) -> Self {
        Self {
            id: game.id,
            organiser_id: game.organiser_id,
            organiser_name: game.organiser_name,
            organiser_phone: None,
            venue: game.venue,
            scheduled_at: game.scheduled_at,
            format: game.format,
            subs: game.subs,
            notes: game.notes,
            players_needed: game.players_needed,
            status: game.status,
            confirmed_count: counts.confirmed,
            reserve_count: counts.reserve,
        }
    }

    pub fn with_organiser_phone(mut self, phone: Option<String>) -> Self {
        self.organiser_phone = phone;
        self
    }
}

/// A game the user takes part in, seen from that user's side.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedGameView {
    pub game_id: GameId,
    pub venue: String,
    pub scheduled_at: DateTime<Utc>,
    pub format: GameFormat,
    pub players_needed: u32,
    pub organiser_name: String,
    pub status: ParticipantStatus,
}

#[derive(Debug, PartialEq)]
pub enum GameError {
    NotFound,
    Forbidden,
    InvalidInput(String),
    RepositoryError,
}

pub(crate) async fn view_with_counts<R>(
    roster_repository: &R,
    game: Game,
) -> Result<GameView, RepoError>
where
    R: RosterRepository + ?Sized,
{
    let participants = roster_repository.list_participants(game.id).await?;
    Ok(GameView::new(game, ParticipantCounts::tally(&participants)))
}

pub(crate) async fn views_with_counts<R>(
    roster_repository: &R,
    games: Vec<Game>,
) -> Result<Vec<GameView>, GameError>
where
    R: RosterRepository + ?Sized,
{
    let mut views = Vec::with_capacity(games.len());
    for game in games {
        let view = view_with_counts(roster_repository, game).await.map_err(|e| {
            log::error!("Failed to count participants: {}", e);
            GameError::RepositoryError
        })?;
        views.push(view);
    }
    Ok(views)
}
