use std::sync::Arc;

use crate::{
    domain::{
        account::{AdminEmailPolicy, UserRepository},
        capacity::{CapacityPolicy, CapacityServiceImpl},
        game::GameRepository,
        lifecycle::ParticipantLifecycleServiceImpl,
        notification::NotificationRepository,
        roster::RosterRepository,
    },
    ports::credentials::PasswordHasher,
    workflow::{
        account::{
            list_users::{ListUsersUseCase, ListUsersUseCaseImpl},
            login::{LoginUseCase, LoginUseCaseImpl},
            register::{RegisterAccountUseCase, RegisterAccountUseCaseImpl},
            remove_user::{RemoveUserUseCase, RemoveUserUseCaseImpl},
        },
        games::{
            create::{CreateGameUseCase, CreateGameUseCaseImpl},
            delete::{DeleteGameUseCase, DeleteGameUseCaseImpl},
            get::{GetGameUseCase, GetGameUseCaseImpl},
            joined::{ListJoinedGamesUseCase, ListJoinedGamesUseCaseImpl},
            list::{ListGamesUseCase, ListGamesUseCaseImpl},
            my_games::{ListMyGamesUseCase, ListMyGamesUseCaseImpl},
        },
        notifications::{
            count::{CountUnreadNotificationsUseCase, CountUnreadNotificationsUseCaseImpl},
            list::{ListNotificationsUseCase, ListNotificationsUseCaseImpl},
            mark_read::{MarkNotificationReadUseCase, MarkNotificationReadUseCaseImpl},
        },
        participants::{
            approve::{ApproveParticipantUseCase, ApproveParticipantUseCaseImpl},
            decline::{DeclineParticipantUseCase, DeclineParticipantUseCaseImpl},
            join::{JoinGameUseCase, JoinGameUseCaseImpl},
            list::{ListParticipantsUseCase, ListParticipantsUseCaseImpl},
            remove::{RemoveParticipantUseCase, RemoveParticipantUseCaseImpl},
            withdraw::{WithdrawUseCase, WithdrawUseCaseImpl},
        },
    },
};

pub mod domain;
pub mod ports;
pub mod workflow;

#[cfg(test)]
mod testing;

#[derive(Debug, Clone)]
pub struct ApplicationConfig {
    pub admin_email: String,
    pub capacity_policy: CapacityPolicy,
}

pub struct Application {
    pub account_register_use_case: Box<dyn RegisterAccountUseCase + Send + Sync + 'static>,
    pub account_login_use_case: Box<dyn LoginUseCase + Send + Sync + 'static>,
    pub admin_list_users_use_case: Box<dyn ListUsersUseCase + Send + Sync + 'static>,
    pub admin_remove_user_use_case: Box<dyn RemoveUserUseCase + Send + Sync + 'static>,

    pub game_create_use_case: Box<dyn CreateGameUseCase + Send + Sync + 'static>,
    pub game_list_use_case: Box<dyn ListGamesUseCase + Send + Sync + 'static>,
    pub game_get_use_case: Box<dyn GetGameUseCase + Send + Sync + 'static>,
    pub game_delete_use_case: Box<dyn DeleteGameUseCase + Send + Sync + 'static>,
    pub game_list_mine_use_case: Box<dyn ListMyGamesUseCase + Send + Sync + 'static>,
    pub game_list_joined_use_case: Box<dyn ListJoinedGamesUseCase + Send + Sync + 'static>,

    pub participant_join_use_case: Box<dyn JoinGameUseCase + Send + Sync + 'static>,
    pub participant_list_use_case: Box<dyn ListParticipantsUseCase + Send + Sync + 'static>,
    pub participant_approve_use_case: Box<dyn ApproveParticipantUseCase + Send + Sync + 'static>,
    pub participant_decline_use_case: Box<dyn DeclineParticipantUseCase + Send + Sync + 'static>,
    pub participant_remove_use_case: Box<dyn RemoveParticipantUseCase + Send + Sync + 'static>,
    pub participant_withdraw_use_case: Box<dyn WithdrawUseCase + Send + Sync + 'static>,

    pub notification_list_use_case: Box<dyn ListNotificationsUseCase + Send + Sync + 'static>,
    pub notification_mark_read_use_case:
        Box<dyn MarkNotificationReadUseCase + Send + Sync + 'static>,
    pub notification_count_use_case:
        Box<dyn CountUnreadNotificationsUseCase + Send + Sync + 'static>,
}

pub fn build_application<
    U: UserRepository + Send + Sync + 'static,
    G: GameRepository + Send + Sync + 'static,
    R: RosterRepository + Send + Sync + 'static,
    N: NotificationRepository + Send + Sync + 'static,
    H: PasswordHasher + Send + Sync + 'static,
>(
    config: ApplicationConfig,
    user_repository: Arc<U>,
    game_repository: Arc<G>,
    roster_repository: Arc<R>,
    notification_repository: Arc<N>,
    password_hasher: Arc<H>,
) -> Application {
    let admin_policy = Arc::new(AdminEmailPolicy::new(config.admin_email));
    let capacity_service = Arc::new(CapacityServiceImpl::new(config.capacity_policy));
    let lifecycle = Arc::new(ParticipantLifecycleServiceImpl::new(capacity_service));

    Application {
        account_register_use_case: Box::new(RegisterAccountUseCaseImpl::new(
            user_repository.clone(),
            password_hasher.clone(),
            admin_policy.clone(),
        )),
        account_login_use_case: Box::new(LoginUseCaseImpl::new(
            user_repository.clone(),
            password_hasher,
            admin_policy.clone(),
        )),
        admin_list_users_use_case: Box::new(ListUsersUseCaseImpl::new(
            user_repository.clone(),
            admin_policy.clone(),
        )),
        admin_remove_user_use_case: Box::new(RemoveUserUseCaseImpl::new(
            user_repository.clone(),
            admin_policy.clone(),
        )),

        game_create_use_case: Box::new(CreateGameUseCaseImpl::new(
            game_repository.clone(),
            user_repository.clone(),
        )),
        game_list_use_case: Box::new(ListGamesUseCaseImpl::new(
            game_repository.clone(),
            roster_repository.clone(),
        )),
        game_get_use_case: Box::new(GetGameUseCaseImpl::new(
            game_repository.clone(),
            roster_repository.clone(),
            user_repository.clone(),
        )),
        game_delete_use_case: Box::new(DeleteGameUseCaseImpl::new(
            game_repository.clone(),
            user_repository.clone(),
            admin_policy,
        )),
        game_list_mine_use_case: Box::new(ListMyGamesUseCaseImpl::new(
            game_repository.clone(),
            roster_repository.clone(),
        )),
        game_list_joined_use_case: Box::new(ListJoinedGamesUseCaseImpl::new(
            game_repository,
            roster_repository.clone(),
        )),

        participant_join_use_case: Box::new(JoinGameUseCaseImpl::new(
            roster_repository.clone(),
            user_repository.clone(),
            lifecycle.clone(),
        )),
        participant_list_use_case: Box::new(ListParticipantsUseCaseImpl::new(
            roster_repository.clone(),
            user_repository.clone(),
        )),
        participant_approve_use_case: Box::new(ApproveParticipantUseCaseImpl::new(
            roster_repository.clone(),
            lifecycle.clone(),
        )),
        participant_decline_use_case: Box::new(DeclineParticipantUseCaseImpl::new(
            roster_repository.clone(),
            lifecycle.clone(),
        )),
        participant_remove_use_case: Box::new(RemoveParticipantUseCaseImpl::new(
            roster_repository.clone(),
            lifecycle.clone(),
        )),
        participant_withdraw_use_case: Box::new(WithdrawUseCaseImpl::new(
            roster_repository,
            user_repository,
            lifecycle,
        )),

        notification_list_use_case: Box::new(ListNotificationsUseCaseImpl::new(
            notification_repository.clone(),
        )),
        notification_mark_read_use_case: Box::new(MarkNotificationReadUseCaseImpl::new(
            notification_repository.clone(),
        )),
        notification_count_use_case: Box::new(CountUnreadNotificationsUseCaseImpl::new(
            notification_repository,
        )),
    }
}
