use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use chrono::Duration;
use finguard_application::{RateLimitConfig, SuspiciousActivityConfig};
use finguard_core::AppError;
use finguard_domain::OperationKind;
use finguard_infrastructure::HttpAuditSinkConfig;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub enum AuditSinkConfig {
    Console,
    Postgres { database_url: String },
    Http(HttpAuditSinkConfig),
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub api_host: String,
    pub api_port: u16,
    pub frontend_url: String,
    pub admin_token: Option<String>,
    pub audit_sink: AuditSinkConfig,
    pub rate_limit: RateLimitConfig,
    pub suspicious_activity: SuspiciousActivityConfig,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");
        let mut config = Self::from_lookup(|name| env::var(name).ok())?;
        config.migrate_only = migrate_only;
        Ok(config)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = EnvLookup(lookup);

        let api_host = vars.get("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = vars.parse::<u16>("API_PORT")?.unwrap_or(3001);
        let frontend_url = vars
            .get("FRONTEND_URL")
            .unwrap_or_else(|| "http://localhost:3000".to_owned());

        let admin_token = vars.get("ADMIN_TOKEN");
        if admin_token.as_ref().is_some_and(|token| token.len() < 32) {
            return Err(AppError::Validation(
                "ADMIN_TOKEN must be at least 32 characters".to_owned(),
            ));
        }

        let audit_sink = match vars
            .get("AUDIT_SINK")
            .unwrap_or_else(|| "console".to_owned())
            .as_str()
        {
            "console" => AuditSinkConfig::Console,
            "postgres" => AuditSinkConfig::Postgres {
                database_url: vars.required("DATABASE_URL")?,
            },
            "http" => AuditSinkConfig::Http(HttpAuditSinkConfig {
                endpoint: vars.required("AUDIT_HTTP_ENDPOINT")?,
                api_key: vars.required("AUDIT_HTTP_API_KEY")?,
                max_attempts: vars.parse::<u8>("AUDIT_HTTP_MAX_ATTEMPTS")?.unwrap_or(3),
                retry_backoff_ms: vars.parse::<u64>("AUDIT_HTTP_RETRY_BACKOFF_MS")?.unwrap_or(250),
            }),
            other => {
                return Err(AppError::Validation(format!(
                    "AUDIT_SINK must be one of 'console', 'postgres' or 'http', got '{other}'"
                )));
            }
        };

        Ok(Self {
            migrate_only: false,
            api_host,
            api_port,
            frontend_url,
            admin_token,
            audit_sink,
            rate_limit: rate_limit_config(&vars)?,
            suspicious_activity: suspicious_activity_config(&vars)?,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
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

fn rate_limit_config<F>(vars: &EnvLookup<F>) -> Result<RateLimitConfig, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let window_ms = vars
        .parse::<i64>("RATE_LIMIT_WINDOW_MS")?
        .unwrap_or(RateLimitConfig::DEFAULT_WINDOW_MS);
    let window = Duration::try_milliseconds(window_ms).ok_or_else(|| {
        AppError::Validation(format!("RATE_LIMIT_WINDOW_MS is out of range: {window_ms}"))
    })?;
    let mut config = RateLimitConfig::new(window)?;

    if let Some(default_max) = vars.parse::<u32>("RATE_LIMIT_DEFAULT_MAX")? {
        config = config.with_default_max_attempts(default_max)?;
    }

    let overrides = [
        ("RATE_LIMIT_LOGIN_MAX", OperationKind::Login),
        ("RATE_LIMIT_PASSWORD_CHANGE_MAX", OperationKind::PasswordChange),
        ("RATE_LIMIT_FORM_SUBMISSION_MAX", OperationKind::FormSubmission),
        ("RATE_LIMIT_API_CALL_MAX", OperationKind::ApiCall),
        ("RATE_LIMIT_API_REQUEST_MAX", OperationKind::ApiRequest),
    ];
    for (name, operation) in overrides {
        if let Some(max_attempts) = vars.parse::<u32>(name)? {
            config = config.with_operation_limit(operation, max_attempts)?;
        }
    }

    if let Some(seconds) = vars.parse::<u64>("RATE_LIMIT_SWEEP_INTERVAL_SECONDS")? {
        if seconds == 0 {
            return Err(AppError::Validation(
                "RATE_LIMIT_SWEEP_INTERVAL_SECONDS must be greater than zero".to_owned(),
            ));
        }
        config = config.with_sweep_interval(std::time::Duration::from_secs(seconds));
    }

    Ok(config)
}

fn suspicious_activity_config<F>(vars: &EnvLookup<F>) -> Result<SuspiciousActivityConfig, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = SuspiciousActivityConfig::default();
    let block_window = match vars.parse::<i64>("SUSPICION_BLOCK_WINDOW_SECONDS")? {
        Some(seconds) => Duration::try_seconds(seconds).ok_or_else(|| {
            AppError::Validation(format!(
                "SUSPICION_BLOCK_WINDOW_SECONDS is out of range: {seconds}"
            ))
        })?,
        None => defaults.block_window,
    };
    let config = SuspiciousActivityConfig {
        block_threshold: vars
            .parse::<u32>("SUSPICION_BLOCK_THRESHOLD")?
            .unwrap_or(defaults.block_threshold),
        block_window,
        ..defaults
    };
    config.validate()?;

    Ok(config)
}

struct EnvLookup<F>(F);

impl<F> EnvLookup<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, name: &str) -> Option<String> {
        (self.0)(name).filter(|value| !value.trim().is_empty())
    }

    fn required(&self, name: &str) -> Result<String, AppError> {
        self.get(name)
            .ok_or_else(|| AppError::Validation(format!("{name} is required")))
    }

    fn parse<T>(&self, name: &str) -> Result<Option<T>, AppError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(name)
            .map(|value| {
                value
                    .trim()
                    .parse::<T>()
                    .map_err(|error| AppError::Validation(format!("invalid {name}: {error}")))
            })
            .transpose()
    }
}
