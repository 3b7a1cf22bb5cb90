pub trait PasswordHasher {
    fn hash_password(&self, password: &str) -> Result<String, CredentialError>;
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, CredentialError>;
}

#[derive(Debug, Clone)]
pub struct CredentialError(pub String);

pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    pub fn new() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }

    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash_password(&self, password: &str) -> Result<String, CredentialError> {
        bcrypt::hash(password, self.cost).map_err(|e| CredentialError(e.to_string()))
    }

    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, CredentialError> {
        bcrypt::verify(password, hash).map_err(|e| CredentialError(e.to_string()))
    }
}
