use std::sync::Arc;

use crate::{
    domain::{NotificationId, UserId, notification::NotificationRepository},
    workflow::notifications::NotificationError,
};

#[async_trait::async_trait]
pub trait MarkNotificationReadUseCase {
    async fn mark_read(
        &self,
        user_id: UserId,
        notification_id: NotificationId,
    ) -> Result<(), NotificationError>;
}

pub struct MarkNotificationReadUseCaseImpl<N: NotificationRepository> {
    notification_repository: Arc<N>,
}

impl<N: NotificationRepository> MarkNotificationReadUseCaseImpl<N> {
    pub fn new(notification_repository: Arc<N>) -> Self {
        Self {
            notification_repository,
        }
    }
}

#[async_trait::async_trait]
impl<N: NotificationRepository + Send + Sync + 'static> MarkNotificationReadUseCase
    for MarkNotificationReadUseCaseImpl<N>
{
    async fn mark_read(
        &self,
        user_id: UserId,
        notification_id: NotificationId,
    ) -> Result<(), NotificationError> {
        match self
            .notification_repository
            .mark_read(notification_id, user_id)
            .await
        {
            Ok(true) => Ok(()),
            Ok(false) => Err(NotificationError::NotFound),
            Err(e) => {
                log::error!("Failed to mark notification {} read: {}", notification_id, e);
                Err(NotificationError::RepositoryError)
            }
        }
    }
}
