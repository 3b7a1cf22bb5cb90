use std::sync::Arc;

use crate::{
    domain::{
        RepoRetrieveError,
        account::{AdministrationPolicy, UserRepository},
    },
    ports::credentials::PasswordHasher,
    workflow::account::AccountView,
};

#[derive(Debug, PartialEq)]
pub enum LoginError {
    InvalidCredentials,
    RepositoryError,
}

#[async_trait::async_trait]
pub trait LoginUseCase {
    async fn login(&self, email: &str, password: &str) -> Result<AccountView, LoginError>;
}

pub struct LoginUseCaseImpl<U: UserRepository, H: PasswordHasher, P: AdministrationPolicy> {
    user_repository: Arc<U>,
    password_hasher: Arc<H>,
    admin_policy: Arc<P>,
}

impl<U: UserRepository, H: PasswordHasher, P: AdministrationPolicy> LoginUseCaseImpl<U, H, P> {
    pub fn new(user_repository: Arc<U>, password_hasher: Arc<H>, admin_policy: Arc<P>) -> Self {
        Self {
            user_repository,
            password_hasher,
            admin_policy,
        }
    }
}

#[async_trait::async_trait]
impl<U, H, P> LoginUseCase for LoginUseCaseImpl<U, H, P>
where
    U: UserRepository + Send + Sync + 'static,
    H: PasswordHasher + Send + Sync + 'static,
    P: AdministrationPolicy + Send + Sync + 'static,
{
    async fn login(&self, email: &str, password: &str) -> Result<AccountView, LoginError> {
        let user = match self.user_repository.get_user_by_email(email.trim()).await {
            Ok(user) => user,
            Err(RepoRetrieveError::NotFound) => return Err(LoginError::InvalidCredentials),
            Err(RepoRetrieveError::StorageError(e)) => {
                log::error!("Failed to load user by email: {}", e);
                return Err(LoginError::RepositoryError);
            }
        };

        let valid = self
            .password_hasher
            .verify_password(password, &user.password_hash)
            .map_err(|e| {
                log::error!("Failed to verify password for {}: {:?}", user.id, e);
                LoginError::RepositoryError
            })?;
        if !valid {
            log::info!("Rejected login for user {}", user.id);
            return Err(LoginError::InvalidCredentials);
        }

        Ok(AccountView::new(&user, self.admin_policy.is_admin(&user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::account::AdminEmailPolicy,
        ports::credentials::BcryptPasswordHasher,
        testing::{InMemoryStore, user_named},
    };

    type TestLogin = LoginUseCaseImpl<InMemoryStore, BcryptPasswordHasher, AdminEmailPolicy>;

    fn setup() -> (Arc<InMemoryStore>, TestLogin) {
        let store = Arc::new(InMemoryStore::new());
        let hasher = Arc::new(BcryptPasswordHasher::with_cost(4));
        let mut user = user_named("Sam");
        user.password_hash = hasher.hash_password("hunter22").unwrap();
        store.insert_user(user);
        let use_case = LoginUseCaseImpl::new(
            store.clone(),
            hasher,
            Arc::new(AdminEmailPolicy::new("sam@example.com")),
        );
        (store, use_case)
    }

    #[tokio::test]
    async fn accepts_the_right_password() {
        let (_, use_case) = setup();
        let account = use_case.login("sam@example.com", "hunter22").await.unwrap();
        assert_eq!(account.name, "Sam");
        assert!(account.is_admin);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let (_, use_case) = setup();
        assert_eq!(
            use_case.login("sam@example.com", "hunter23").await,
            Err(LoginError::InvalidCredentials)
        );
        assert_eq!(
            use_case.login("nobody@example.com", "hunter22").await,
            Err(LoginError::InvalidCredentials)
        );
    }
}
