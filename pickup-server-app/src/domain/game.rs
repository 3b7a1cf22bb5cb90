use chrono::{DateTime, Utc};

use crate::domain::{GameId, RepoError, RepoRetrieveError, UserId, capacity::Capacity};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameFormat {
    FiveASide,
    SixASide,
    SevenASide,
    EightASide,
    NineASide,
    TenASide,
    ElevenASide,
}

impl GameFormat {
    pub fn players_per_team(&self) -> u32 {
        match self {
            GameFormat::FiveASide => 5,
            GameFormat::SixASide => 6,
            GameFormat::SevenASide => 7,
            GameFormat::EightASide => 8,
            GameFormat::NineASide => 9,
            GameFormat::TenASide => 10,
            GameFormat::ElevenASide => 11,
        }
    }

    pub fn from_players_per_team(players: u32) -> Option<Self> {
        match players {
            5 => Some(GameFormat::FiveASide),
            6 => Some(GameFormat::SixASide),
            7 => Some(GameFormat::SevenASide),
            8 => Some(GameFormat::EightASide),
            9 => Some(GameFormat::NineASide),
            10 => Some(GameFormat::TenASide),
            11 => Some(GameFormat::ElevenASide),
            _ => None,
        }
    }
}

impl std::fmt::Display for GameFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}s", self.players_per_team())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseGameFormatError(pub String);

impl std::fmt::Display for ParseGameFormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid game format {}", self.0)
    }
}

impl std::str::FromStr for GameFormat {
    type Err = ParseGameFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .strip_suffix('s')
            .and_then(|n| n.parse::<u32>().ok())
            .and_then(GameFormat::from_players_per_team)
            .ok_or_else(|| ParseGameFormatError(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Open,
    Full,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Open => "OPEN",
            GameStatus::Full => "FULL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "OPEN" => Some(GameStatus::Open),
            "FULL" => Some(GameStatus::Full),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Game {
    pub id: GameId,
    pub organiser_id: UserId,
    pub organiser_name: String,
    pub venue: String,
    pub scheduled_at: DateTime<Utc>,
    pub format: GameFormat,
    pub subs: Option<f64>,
    pub notes: Option<String>,
    pub players_requested: u32,
    pub players_needed: u32,
    pub status: GameStatus,
    pub version: u64,
    pub created_at: DateTime<Utc>,
}

pub struct GameDetails {
    pub venue: String,
    pub scheduled_at: DateTime<Utc>,
    pub format: GameFormat,
    pub subs: Option<f64>,
    pub notes: Option<String>,
    pub players_needed: u32,
}

impl Game {
    pub fn new(
        organiser_id: UserId,
        organiser_name: String,
        details: GameDetails,
        created_at: DateTime<Utc>,
    ) -> Self {
        let capacity = Capacity::new(details.players_needed);
        Self {
            id: GameId::new(),
            organiser_id,
            organiser_name,
            venue: details.venue,
            scheduled_at: details.scheduled_at,
            format: details.format,
            subs: details.subs,
            notes: details.notes,
            players_requested: details.players_needed,
            players_needed: capacity.players_needed(),
            status: capacity.status(),
            version: 0,
            created_at,
        }
    }

    pub fn is_organised_by(&self, user: UserId) -> bool {
        self.organiser_id == user
    }
}

#[derive(Debug, Clone, Default)]
pub struct GameQuery {
    pub organiser: Option<UserId>,
    pub ids: Option<Vec<GameId>>,
}

impl GameQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_organiser(mut self, organiser: UserId) -> Self {
        self.organiser = Some(organiser);
        self
    }

    pub fn with_ids(mut self, ids: Vec<GameId>) -> Self {
        self.ids = Some(ids);
        self
    }
}

#[async_trait::async_trait]
pub trait GameRepository {
    async fn create_game(&self, game: Game) -> Result<(), RepoError>;
    async fn get_game(&self, game_id: GameId) -> Result<Game, RepoRetrieveError>;
    /// Games matching the query, earliest scheduled first.
    async fn list_games(&self, query: GameQuery) -> Result<Vec<Game>, RepoError>;
    /// Deletes the game and all of its participants.
    async fn delete_game(&self, game_id: GameId) -> Result<(), RepoRetrieveError>;
}
