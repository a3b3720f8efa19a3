use anyhow::{anyhow, Context, Result};
use std::env;
use std::fmt;

/// Default request ceiling: 16 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    /// Empty means any origin is allowed.
    pub cors_allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
}

#[derive(Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub endpoint: Option<String>,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl Config {
    /// Loads `.env` (if any) and reads settings from the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required =
            |key: &'static str| var(key).ok_or_else(|| anyhow!("{} must be set", key));

        Ok(Self {
            server: ServerConfig {
                port: parse_or(var("PORT"), "PORT", 5000)?,
                host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                cors_allowed_origins: var("ALLOWED_ORIGINS")
                    .map(|origins| {
                        origins
                            .split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect()
                    })
                    .unwrap_or_default(),
                max_upload_bytes: parse_or(
                    var("MAX_UPLOAD_BYTES"),
                    "MAX_UPLOAD_BYTES",
                    DEFAULT_MAX_UPLOAD_BYTES,
                )?,
            },
            database: DatabaseConfig {
                host: required("DB_HOST")?,
                port: parse_or(var("DB_PORT"), "DB_PORT", 3306)?,
                name: required("DB_NAME")?,
                user: required("DB_USER")?,
                password: lookup("DB_PASSWORD").unwrap_or_default(),
            },
            storage: StorageConfig {
                bucket: required("S3_BUCKET")?,
                region: required("S3_REGION")?,
                access_key: var("S3_ACCESS_KEY"),
                secret_key: var("S3_SECRET_KEY"),
                endpoint: var("S3_ENDPOINT"),
            },
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}
