use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};

use crate::error::OrreryError;

/// Runtime configuration, merged from defaults and `ORRERY_*` environment
/// variables (a `.env` file is honored by `main` before loading).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub loglevel: String,
    /// HS256 signing secret for session tokens. Must be set for `serve`.
    pub token_secret: String,
    pub token_ttl_hours: i64,
    pub reset_ttl_minutes: i64,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub mail_from: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:orrery.db".to_string(),
            bind_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            token_secret: String::new(),
            token_ttl_hours: 24,
            reset_ttl_minutes: 30,
            smtp_host: None,
            smtp_port: None,
            smtp_username: None,
            smtp_password: None,
            mail_from: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, OrreryError> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed("ORRERY_"))
            .extract()
            .map_err(|e| OrreryError::Config(e.to_string()))
    }

    /// Serving requires a signing secret; the admin commands do not.
    pub fn require_token_secret(&self) -> Result<(), OrreryError> {
        if self.token_secret.is_empty() {
            return Err(OrreryError::Config(
                "ORRERY_TOKEN_SECRET must be set to serve requests".to_string(),
            ));
        }
        Ok(())
    }
}
