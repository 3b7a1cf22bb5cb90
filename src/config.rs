use pickup_server_app::domain::capacity::CapacityPolicy;
use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_HTTP_PORT: u16 = 8001;
const DEFAULT_TOKEN_TTL_HOURS: i64 = 720;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{0} has an invalid value: {1}")]
    Invalid(&'static str, String),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub http_port: u16,
    pub db_path: String,
    pub jwt_secret: Option<String>,
    pub token_ttl_hours: i64,
    pub admin_email: String,
    pub capacity_policy: CapacityPolicy,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let http_port = match lookup("PICKUP_HTTP_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid("PICKUP_HTTP_PORT", raw))?,
            None => DEFAULT_HTTP_PORT,
        };
        let token_ttl_hours = match lookup("PICKUP_TOKEN_TTL_HOURS") {
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|hours| *hours > 0)
                .ok_or(ConfigError::Invalid("PICKUP_TOKEN_TTL_HOURS", raw))?,
            None => DEFAULT_TOKEN_TTL_HOURS,
        };
        let capacity_policy = match lookup("PICKUP_CAPACITY_POLICY") {
            Some(raw) => parse_capacity_policy(&raw)
                .ok_or(ConfigError::Invalid("PICKUP_CAPACITY_POLICY", raw))?,
            None => CapacityPolicy::default(),
        };

        Ok(Self {
            host: lookup("PICKUP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            http_port,
            db_path: required("PICKUP_DB")?,
            jwt_secret: lookup("PICKUP_JWT_SECRET").filter(|s| !s.is_empty()),
            token_ttl_hours,
            admin_email: required("PICKUP_ADMIN_EMAIL")?,
            capacity_policy,
        })
    }
}

fn parse_capacity_policy(raw: &str) -> Option<CapacityPolicy> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "unbounded" => Some(CapacityPolicy::Unbounded),
        "capped" => Some(CapacityPolicy::CappedAtRequested),
        _ => None,
    }
}
