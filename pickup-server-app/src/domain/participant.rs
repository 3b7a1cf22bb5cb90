use chrono::{DateTime, Utc};

use crate::domain::{GameId, ParticipantId, UserId, account::User};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParticipantStatus {
    Requested,
    Reserve,
    Confirmed,
}

impl ParticipantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantStatus::Requested => "REQUESTED",
            ParticipantStatus::Reserve => "RESERVE",
            ParticipantStatus::Confirmed => "CONFIRMED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "REQUESTED" => Some(ParticipantStatus::Requested),
            "RESERVE" => Some(ParticipantStatus::Reserve),
            "CONFIRMED" => Some(ParticipantStatus::Confirmed),
            _ => None,
        }
    }
}

/// Initial status a user asks for when joining a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinAction {
    Request,
    Reserve,
}

impl JoinAction {
    pub fn initial_status(&self) -> ParticipantStatus {
        match self {
            JoinAction::Request => ParticipantStatus::Requested,
            JoinAction::Reserve => ParticipantStatus::Reserve,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Participant {
    pub id: ParticipantId,
    pub game_id: GameId,
    pub user_id: UserId,
    pub user_name: String,
    pub user_area: Option<String>,
    pub user_phone: Option<String>,
    pub user_games_played: u32,
    pub status: ParticipantStatus,
    pub joined_at: DateTime<Utc>,
}

impl Participant {
    pub fn new(
        game_id: GameId,
        user: &User,
        status: ParticipantStatus,
        joined_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ParticipantId::new(),
            game_id,
            user_id: user.id,
            user_name: user.name.clone(),
            user_area: user.area.clone(),
            user_phone: user.phone.clone(),
            user_games_played: user.games_played,
            status,
            joined_at,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParticipantCounts {
    pub confirmed: usize,
    pub reserve: usize,
}

impl ParticipantCounts {
    pub fn tally<'a>(participants: impl IntoIterator<Item = &'a Participant>) -> Self {
        participants
            .into_iter()
            .fold(Self::default(), |mut counts, p| {
                match p.status {
                    ParticipantStatus::Confirmed => counts.confirmed += 1,
                    ParticipantStatus::Reserve => counts.reserve += 1,
                    ParticipantStatus::Requested => {}
                }
                counts
            })
    }
}
