use std::sync::Arc;

use crate::{
    domain::{UserId, notification::NotificationRepository},
    workflow::notifications::NotificationError,
};

#[async_trait::async_trait]
pub trait CountUnreadNotificationsUseCase {
    async fn count_unread(&self, user_id: UserId) -> Result<usize, NotificationError>;
}

pub struct CountUnreadNotificationsUseCaseImpl<N: NotificationRepository> {
    notification_repository: Arc<N>,
}

impl<N: NotificationRepository> CountUnreadNotificationsUseCaseImpl<N> {
    pub fn new(notification_repository: Arc<N>) -> Self {
        Self {
            notification_repository,
        }
    }
}

#[async_trait::async_trait]
impl<N: NotificationRepository + Send + Sync + 'static> CountUnreadNotificationsUseCase
    for CountUnreadNotificationsUseCaseImpl<N>
{
    async fn count_unread(&self, user_id: UserId) -> Result<usize, NotificationError> {
        self.notification_repository
            .count_unread(user_id)
            .await
            .map_err(|e| {
                log::error!("Failed to count notifications of {}: {}", user_id, e);
                NotificationError::RepositoryError
            })
    }
}
