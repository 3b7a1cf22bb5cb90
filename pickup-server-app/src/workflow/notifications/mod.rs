pub mod count;
pub mod list;
pub mod mark_read;

#[derive(Debug, PartialEq)]
pub enum NotificationError {
    NotFound,
    RepositoryError,
}
