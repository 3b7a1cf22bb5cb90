use std::sync::Arc;

use validator::Validate;

use crate::{
    domain::{
        RepoCreateError,
        account::{AdministrationPolicy, User, UserRepository},
    },
    ports::credentials::PasswordHasher,
    workflow::account::AccountView,
};

#[derive(Debug, Clone, Validate)]
pub struct RegisterAccount {
    #[validate(length(min = 1, max = 60))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    pub area: Option<String>,
    #[validate(length(max = 120))]
    pub bio: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum RegisterError {
    InvalidInput(String),
    EmailTaken,
    RepositoryError,
}

#[async_trait::async_trait]
pub trait RegisterAccountUseCase {
    async fn register(&self, request: RegisterAccount) -> Result<AccountView, RegisterError>;
}

pub struct RegisterAccountUseCaseImpl<U: UserRepository, H: PasswordHasher, P: AdministrationPolicy>
{
    user_repository: Arc<U>,
    password_hasher: Arc<H>,
    admin_policy: Arc<P>,
}

impl<U: UserRepository, H: PasswordHasher, P: AdministrationPolicy>
    RegisterAccountUseCaseImpl<U, H, P>
{
    pub fn new(user_repository: Arc<U>, password_hasher: Arc<H>, admin_policy: Arc<P>) -> Self {
        Self {
            user_repository,
            password_hasher,
            admin_policy,
        }
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[async_trait::async_trait]
impl<U, H, P> RegisterAccountUseCase for RegisterAccountUseCaseImpl<U, H, P>
where
    U: UserRepository + Send + Sync + 'static,
    H: PasswordHasher + Send + Sync + 'static,
    P: AdministrationPolicy + Send + Sync + 'static,
{
    async fn register(&self, request: RegisterAccount) -> Result<AccountView, RegisterError> {
        request
            .validate()
            .map_err(|e| RegisterError::InvalidInput(e.to_string()))?;
        if request.name.trim().is_empty() {
            return Err(RegisterError::InvalidInput("name must not be blank".into()));
        }

        let password_hash = self
            .password_hasher
            .hash_password(&request.password)
            .map_err(|e| {
                log::error!("Failed to hash password: {:?}", e);
                RegisterError::RepositoryError
            })?;

        let user = User::new(
            request.name.trim().to_string(),
            request.email.trim().to_string(),
            password_hash,
            normalize(request.area),
            normalize(request.bio),
            normalize(request.phone),
            chrono::Utc::now(),
        );

        match self.user_repository.create_user(user.clone()).await {
            Ok(()) => {
                log::info!("Registered user {}", user.id);
                Ok(AccountView::new(&user, self.admin_policy.is_admin(&user)))
            }
            Err(RepoCreateError::Conflict) => Err(RegisterError::EmailTaken),
            Err(RepoCreateError::StorageError(e)) => {
                log::error!("Failed to store new user: {}", e);
                Err(RegisterError::RepositoryError)
            }
        }
    }
}
