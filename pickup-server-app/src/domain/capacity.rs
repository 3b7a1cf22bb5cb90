use crate::domain::game::{Game, GameStatus};

/// Remaining open slots of a game. The status is derived from the count, so
/// a value of this type always satisfies `status == Full` iff `players_needed == 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capacity {
    players_needed: u32,
    status: GameStatus,
}

impl Capacity {
    pub fn new(players_needed: u32) -> Self {
        let status = if players_needed == 0 {
            GameStatus::Full
        } else {
            GameStatus::Open
        };
        Self {
            players_needed,
            status,
        }
    }

    pub fn players_needed(&self) -> u32 {
        self.players_needed
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityExhausted;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapacityPolicy {
    /// Every release reopens one slot, even beyond the originally requested count.
    #[default]
    Unbounded,
    /// Releases never raise `players_needed` above `players_requested`.
    CappedAtRequested,
}

pub trait CapacityService {
    fn reserve_slot(&self, game: &Game) -> Result<Capacity, CapacityExhausted>;
    fn release_slot(&self, game: &Game) -> Capacity;
}

pub struct CapacityServiceImpl {
    policy: CapacityPolicy,
}

impl CapacityServiceImpl {
    pub fn new(policy: CapacityPolicy) -> Self {
        Self { policy }
    }
}

impl CapacityService for CapacityServiceImpl {
    fn reserve_slot(&self, game: &Game) -> Result<Capacity, CapacityExhausted> {
        match game.players_needed.checked_sub(1) {
            Some(remaining) => Ok(Capacity::new(remaining)),
            None => Err(CapacityExhausted),
        }
    }

    fn release_slot(&self, game: &Game) -> Capacity {
        let released = game.players_needed.saturating_add(1);
        let players_needed = match self.policy {
            CapacityPolicy::Unbounded => released,
            CapacityPolicy::CappedAtRequested => released.min(game.players_requested),
        };
        Capacity::new(players_needed)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::{
        UserId,
        game::{GameDetails, GameFormat},
    };

    fn game_needing(players_needed: u32) -> Game {
        let mut game = Game::new(
            UserId::new(),
            "Org".to_string(),
            GameDetails {
                venue: "Venue".to_string(),
                scheduled_at: Utc::now(),
                format: GameFormat::SevenASide,
                subs: None,
                notes: None,
                players_needed: 2,
            },
            Utc::now(),
        );
        let capacity = Capacity::new(players_needed);
        game.players_needed = capacity.players_needed();
        game.status = capacity.status();
        game
    }

    #[test]
    fn reserving_the_last_slot_fills_the_game() {
        let service = CapacityServiceImpl::new(CapacityPolicy::Unbounded);

        let capacity = service.reserve_slot(&game_needing(2)).unwrap();
        assert_eq!(capacity, Capacity::new(1));
        assert_eq!(capacity.status(), GameStatus::Open);

        let capacity = service.reserve_slot(&game_needing(1)).unwrap();
        assert_eq!(capacity.players_needed(), 0);
        assert_eq!(capacity.status(), GameStatus::Full);
    }

    #[test]
    fn status_follows_the_open_slot_count() {
        for players_needed in [0, 1, 7] {
            let capacity = Capacity::new(players_needed);
            assert_eq!(capacity.players_needed(), players_needed);
            assert_eq!(
                capacity.status() == GameStatus::Full,
                players_needed == 0
            );
        }
    }

    #[test]
    fn reserving_on_a_full_game_is_exhausted() {
        let service = CapacityServiceImpl::new(CapacityPolicy::Unbounded);
        assert_eq!(
            service.reserve_slot(&game_needing(0)),
            Err(CapacityExhausted)
        );
    }

    #[test]
    fn release_reopens_a_full_game() {
        let service = CapacityServiceImpl::new(CapacityPolicy::Unbounded);
        let capacity = service.release_slot(&game_needing(0));
        assert_eq!(capacity.players_needed(), 1);
        assert_eq!(capacity.status(), GameStatus::Open);
    }

    #[test]
    fn unbounded_release_can_exceed_the_requested_count() {
        let service = CapacityServiceImpl::new(CapacityPolicy::Unbounded);
        let capacity = service.release_slot(&game_needing(2));
        assert_eq!(capacity.players_needed(), 3);
    }

    #[test]
    fn capped_release_stops_at_the_requested_count() {
        let service = CapacityServiceImpl::new(CapacityPolicy::CappedAtRequested);
        assert_eq!(service.release_slot(&game_needing(1)).players_needed(), 2);
        let capacity = service.release_slot(&game_needing(2));
        assert_eq!(capacity.players_needed(), 2);
        assert_eq!(capacity.status(), GameStatus::Open);
    }
}
