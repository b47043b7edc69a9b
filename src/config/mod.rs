use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

/// Built-in signing key for local development only. Staging and production
/// have no default and must provide `JWT_KEY`.
const DEVELOPMENT_JWT_KEY: &str = "finrecon360-development-signing-key-change-me-0123456789";

/// Minimum HS256 key length in bytes.
pub const MIN_JWT_KEY_BYTES: usize = 32;

/// Token lifetime used when the configured value is zero or negative.
pub const DEFAULT_EXPIRES_MINUTES: i64 = 60;

/// Longest accepted token lifetime (one year).
pub const MAX_EXPIRES_MINUTES: i64 = 525_600;

/// Longest accepted recovery code TTL, either sign (one week).
pub const MAX_RECOVERY_TTL_MINUTES: u64 = 10_080;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub security: SecurityConfig,
    pub recovery: RecoveryConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub key: String,
    pub issuer: String,
    pub audience: String,
    pub expires_minutes: i64,
    pub clock_skew_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryConfig {
    pub code_ttl_minutes: i64,
    /// Use the fixed code `123456` and echo it back to the caller.
    pub demo_codes: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    pub demo_users: bool,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT signing key is not configured (set JWT_KEY)")]
    MissingJwtKey,
    #[error("JWT signing key must be at least 32 bytes, got {0}")]
    JwtKeyTooShort(usize),
    #[error("JWT {0} must not be empty")]
    EmptyJwtField(&'static str),
    #[error("{name} is out of range: {value}")]
    OutOfRange { name: &'static str, value: i64 },
}

impl JwtConfig {
    pub fn effective_expires_minutes(&self) -> i64 {
        if self.expires_minutes <= 0 {
            DEFAULT_EXPIRES_MINUTES
        } else {
            self.expires_minutes
        }
    }

    /// Token lifetime in seconds, as reported to clients in `expiresIn`.
    pub fn expires_in_secs(&self) -> i64 {
        self.effective_expires_minutes() * 60
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("FINRECON_API_HOST") {
            self.server.host = v;
        }
        if let Some(port) = env::var("FINRECON_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }

        // JWT overrides
        if let Ok(v) = env::var("JWT_KEY") {
            self.jwt.key = v;
        }
        if let Ok(v) = env::var("JWT_ISSUER") {
            self.jwt.issuer = v;
        }
        if let Ok(v) = env::var("JWT_AUDIENCE") {
            self.jwt.audience = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRES_MINUTES") {
            self.jwt.expires_minutes = v.parse().unwrap_or(self.jwt.expires_minutes);
        }
        if let Ok(v) = env::var("JWT_CLOCK_SKEW_SECS") {
            self.jwt.clock_skew_secs = v.parse().unwrap_or(self.jwt.clock_skew_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Recovery overrides
        if let Ok(v) = env::var("RECOVERY_CODE_TTL_MINUTES") {
            self.recovery.code_ttl_minutes = v.parse().unwrap_or(self.recovery.code_ttl_minutes);
        }
        if let Ok(v) = env::var("RECOVERY_DEMO_CODES") {
            self.recovery.demo_codes = v.parse().unwrap_or(self.recovery.demo_codes);
        }

        // Seed overrides
        if let Ok(v) = env::var("SEED_DEMO_USERS") {
            self.seed.demo_users = v.parse().unwrap_or(self.seed.demo_users);
        }

        self
    }

    /// Reject configurations the token service cannot run safely with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.key.is_empty() {
            return Err(ConfigError::MissingJwtKey);
        }
        if self.jwt.key.len() < MIN_JWT_KEY_BYTES {
            return Err(ConfigError::JwtKeyTooShort(self.jwt.key.len()));
        }
        if self.jwt.issuer.trim().is_empty() {
            return Err(ConfigError::EmptyJwtField("issuer"));
        }
        if self.jwt.audience.trim().is_empty() {
            return Err(ConfigError::EmptyJwtField("audience"));
        }
        if self.jwt.expires_minutes > MAX_EXPIRES_MINUTES {
            return Err(ConfigError::OutOfRange {
                name: "JWT_EXPIRES_MINUTES",
                value: self.jwt.expires_minutes,
            });
        }
        if self.recovery.code_ttl_minutes.unsigned_abs() > MAX_RECOVERY_TTL_MINUTES {
            return Err(ConfigError::OutOfRange {
                name: "RECOVERY_CODE_TTL_MINUTES",
                value: self.recovery.code_ttl_minutes,
            });
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            jwt: JwtConfig {
                key: DEVELOPMENT_JWT_KEY.to_string(),
                issuer: "FinRecon360".to_string(),
                audience: "FinRecon360Client".to_string(),
                expires_minutes: DEFAULT_EXPIRES_MINUTES,
                clock_skew_secs: 30,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:4200".to_string()],
            },
            recovery: RecoveryConfig {
                code_ttl_minutes: 10,
                demo_codes: true,
            },
            seed: SeedConfig { demo_users: true },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            jwt: JwtConfig {
                key: String::new(),
                issuer: "FinRecon360".to_string(),
                audience: "FinRecon360Client".to_string(),
                expires_minutes: DEFAULT_EXPIRES_MINUTES,
                clock_skew_secs: 30,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.finrecon360.example".to_string()],
            },
            recovery: RecoveryConfig {
                code_ttl_minutes: 10,
                demo_codes: false,
            },
            seed: SeedConfig { demo_users: true },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            jwt: JwtConfig {
                key: String::new(),
                issuer: "FinRecon360".to_string(),
                audience: "FinRecon360Client".to_string(),
                expires_minutes: 30,
                clock_skew_secs: 30,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.finrecon360.example".to_string()],
            },
            recovery: RecoveryConfig {
                code_ttl_minutes: 10,
                demo_codes: false,
            },
            seed: SeedConfig { demo_users: false },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
