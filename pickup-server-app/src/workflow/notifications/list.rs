use std::sync::Arc;

use crate::{
    domain::{
        UserId,
        notification::{NOTIFICATION_PAGE_SIZE, Notification, NotificationRepository},
    },
    workflow::notifications::NotificationError,
};

#[async_trait::async_trait]
pub trait ListNotificationsUseCase {
    async fn list_notifications(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Notification>, NotificationError>;
}

pub struct ListNotificationsUseCaseImpl<N: NotificationRepository> {
    notification_repository: Arc<N>,
}

impl<N: NotificationRepository> ListNotificationsUseCaseImpl<N> {
    pub fn new(notification_repository: Arc<N>) -> Self {
        Self {
            notification_repository,
        }
    }
}

#[async_trait::async_trait]
impl<N: NotificationRepository + Send + Sync + 'static> ListNotificationsUseCase
    for ListNotificationsUseCaseImpl<N>
{
    async fn list_notifications(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Notification>, NotificationError> {
        self.notification_repository
            .list_notifications(user_id, NOTIFICATION_PAGE_SIZE)
            .await
            .map_err(|e| {
                log::error!("Failed to list notifications of {}: {}", user_id, e);
                NotificationError::RepositoryError
            })
    }
}
