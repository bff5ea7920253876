use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use stationdesk_core::AppError;
use stationdesk_infrastructure::{PostgresPoolConfig, StaticAccount};
use tracing_subscriber::EnvFilter;

/// Where profiles, sessions and overlay records are stored.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    Memory,
    Postgres(PostgresPoolConfig),
}

/// Admin profile created at startup for the database provider.
#[derive(Debug, Clone)]
pub struct BootstrapAdminConfig {
    pub email: String,
    pub password: String,
}

/// Sign-in mechanism selected at startup.
#[derive(Debug, Clone)]
pub enum AuthProviderConfig {
    Static(Vec<StaticAccount>),
    Database {
        bootstrap_admin: Option<BootstrapAdminConfig>,
    },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub api_host: String,
    pub api_port: u16,
    pub frontend_url: String,
    pub storage: StorageConfig,
    pub auth_provider: AuthProviderConfig,
    pub session_ttl_minutes: i64,
    pub cookie_secure: bool,
    pub module_access_enabled: bool,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");
        Self::from_lookup(migrate_only, |name| env::var(name).ok())
    }

    fn from_lookup(
        migrate_only: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_host = non_empty("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = parse_or("API_PORT", non_empty("API_PORT"), 3001_u16)?;
        let frontend_url =
            non_empty("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_owned());

        let storage = match non_empty("STORAGE_BACKEND")
            .unwrap_or_else(|| "memory".to_owned())
            .as_str()
        {
            "memory" => StorageConfig::Memory,
            "postgres" => StorageConfig::Postgres(PostgresPoolConfig {
                database_url: non_empty("DATABASE_URL").ok_or_else(|| {
                    AppError::Validation(
                        "DATABASE_URL is required when STORAGE_BACKEND=postgres".to_owned(),
                    )
                })?,
                max_connections: parse_or(
                    "DATABASE_MAX_CONNECTIONS",
                    non_empty("DATABASE_MAX_CONNECTIONS"),
                    10_u32,
                )?,
                acquire_timeout: Duration::from_secs(parse_or(
                    "DATABASE_ACQUIRE_TIMEOUT_SECS",
                    non_empty("DATABASE_ACQUIRE_TIMEOUT_SECS"),
                    5_u64,
                )?),
            }),
            other => {
                return Err(AppError::Validation(format!(
                    "STORAGE_BACKEND must be either 'memory' or 'postgres', got '{other}'"
                )));
            }
        };

        let auth_provider = match non_empty("AUTH_PROVIDER")
            .unwrap_or_else(|| "static".to_owned())
            .as_str()
        {
            "static" => {
                let accounts =
                    StaticAccount::parse_list(&non_empty("STATIC_AUTH_ACCOUNTS").unwrap_or_default())?;
                if accounts.is_empty() {
                    return Err(AppError::Validation(
                        "STATIC_AUTH_ACCOUNTS must list at least one account when AUTH_PROVIDER=static"
                            .to_owned(),
                    ));
                }
                AuthProviderConfig::Static(accounts)
            }
            "database" => AuthProviderConfig::Database {
                bootstrap_admin: match (
                    non_empty("BOOTSTRAP_ADMIN_EMAIL"),
                    non_empty("BOOTSTRAP_ADMIN_PASSWORD"),
                ) {
                    (Some(email), Some(password)) => Some(BootstrapAdminConfig { email, password }),
                    _ => None,
                },
            },
            other => {
                return Err(AppError::Validation(format!(
                    "AUTH_PROVIDER must be either 'static' or 'database', got '{other}'"
                )));
            }
        };

        let session_ttl_minutes =
            parse_or("SESSION_TTL_MINUTES", non_empty("SESSION_TTL_MINUTES"), 480_i64)?;
        if session_ttl_minutes <= 0 {
            return Err(AppError::Validation(
                "SESSION_TTL_MINUTES must be positive".to_owned(),
            ));
        }

        Ok(Self {
            migrate_only,
            api_host,
            api_port,
            frontend_url,
            storage,
            auth_provider,
            session_ttl_minutes,
            cookie_secure: flag(non_empty("SESSION_COOKIE_SECURE"), false),
            module_access_enabled: flag(non_empty("MODULE_ACCESS_ENABLED"), true),
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Validation(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;

        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_or<T: FromStr>(name: &str, value: Option<String>, default: T) -> Result<T, AppError>
where
    T::Err: std::fmt::Display,
{
    match value {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name}: {error}"))),
        None => Ok(default),
    }
}

fn flag(value: Option<String>, default: bool) -> bool {
    value.map_or(default, |value| value.trim().eq_ignore_ascii_case("true"))
}
