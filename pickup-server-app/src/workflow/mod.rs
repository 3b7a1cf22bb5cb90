pub mod account;
pub mod games;
pub mod notifications;
pub mod participants;
