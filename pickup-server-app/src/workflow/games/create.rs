use std::sync::Arc;

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::{
    domain::{
        RepoRetrieveError, UserId,
        account::UserRepository,
        game::{Game, GameDetails, GameFormat, GameRepository},
        participant::ParticipantCounts,
    },
    workflow::games::{GameError, GameView},
};

#[derive(Debug, Clone, Validate)]
pub struct CreateGame {
    #[validate(length(min = 1, max = 120))]
    pub venue: String,
    pub scheduled_at: DateTime<Utc>,
    pub format: GameFormat,
    #[validate(range(min = 0.0))]
    pub subs: Option<f64>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    #[validate(range(min = 1, max = 50))]
    pub players_needed: u32,
}

#[async_trait::async_trait]
pub trait CreateGameUseCase {
    async fn create_game(&self, organiser: UserId, request: CreateGame)
    -> Result<GameView, GameError>;
}

pub struct CreateGameUseCaseImpl<G: GameRepository, U: UserRepository> {
    game_repository: Arc<G>,
    user_repository: Arc<U>,
}

impl<G: GameRepository, U: UserRepository> CreateGameUseCaseImpl<G, U> {
    pub fn new(game_repository: Arc<G>, user_repository: Arc<U>) -> Self {
        Self {
            game_repository,
            user_repository,
        }
    }
}

#[async_trait::async_trait]
impl<G, U> CreateGameUseCase for CreateGameUseCaseImpl<G, U>
where
    G: GameRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    async fn create_game(
        &self,
        organiser: UserId,
        request: CreateGame,
    ) -> Result<GameView, GameError> {
        request
            .validate()
            .map_err(|e| GameError::InvalidInput(e.to_string()))?;
        let venue = request.venue.trim().to_string();
        if venue.is_empty() {
            return Err(GameError::InvalidInput("venue must not be blank".into()));
        }

        let organiser = match self.user_repository.get_user(organiser).await {
            Ok(user) => user,
            Err(RepoRetrieveError::NotFound) => return Err(GameError::NotFound),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Failed to load organiser {}: {}", organiser, e);
                return Err(GameError::RepositoryError);
            }
        };

        let game = Game::new(
            organiser.id,
            organiser.name.clone(),
            GameDetails {
                venue,
                scheduled_at: request.scheduled_at,
                format: request.format,
                subs: request.subs,
                notes: request.notes.filter(|n| !n.trim().is_empty()),
                players_needed: request.players_needed,
            },
            Utc::now(),
        );

        self.game_repository
            .create_game(game.clone())
            .await
            .map_err(|e| {
                log::error!("Failed to store game: {}", e);
                GameError::RepositoryError
            })?;
        log::info!(
            "User {} created game {} at {} needing {}",
            organiser.id,
            game.id,
            game.venue,
            game.players_needed
        );

        Ok(GameView::new(game, ParticipantCounts::default())
            .with_organiser_phone(organiser.phone))
    }
}
