use serde::Deserialize;

/// Deployment environment, read from `ENV`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Minimum length of the token signing secret
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    pub database_url: String,
    pub identity_jwt_secret: String,
    #[serde(default = "default_issuer")]
    pub identity_issuer: String,
    #[serde(default = "default_token_expiry_hours")]
    pub identity_token_expiry_hours: i64,
    #[serde(default)]
    pub env: Environment,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: String,
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

fn default_issuer() -> String {
    "studysync".to_string()
}

const fn default_token_expiry_hours() -> i64 {
    24
}

const fn default_port() -> u16 {
    3000
}

fn default_allowed_origins() -> String {
    "http://localhost:5173".to_string()
}

const fn default_db_max_connections() -> u32 {
    10
}

const fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl ApiConfig {
    /// Load from process environment variables (`DATABASE_URL`, `IDENTITY_JWT_SECRET`, ...).
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env::<Self>()
    }

    /// Reject settings that would start a misconfigured server.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.identity_jwt_secret.len() < MIN_SECRET_LEN {
            anyhow::bail!("IDENTITY_JWT_SECRET must be at least {MIN_SECRET_LEN} bytes long");
        }
        if self.identity_token_expiry_hours <= 0 {
            anyhow::bail!("IDENTITY_TOKEN_EXPIRY_HOURS must be positive");
        }
        Ok(())
    }

    pub fn parsed_allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}
