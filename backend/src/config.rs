use std::env;
use std::fmt;
use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::{bail, Context};
use rocket::figment::Figment;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://notes.db?mode=rwc";
pub const DEFAULT_STATIC_DIR: &str = "../frontend/dist";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub environment: Environment,
    /// Empty means any origin.
    pub cors_origins: Vec<String>,
    pub host: Option<IpAddr>,
    pub port: Option<u16>,
    pub static_dir: PathBuf,
}

impl Settings {
    /// Reads the process environment; call `dotenv()` first to pick up `.env`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let environment = match lookup("ENVIRONMENT").as_deref() {
            None | Some("") | Some("development") => Environment::Development,
            Some("production") => Environment::Production,
            Some(other) => bail!("Unknown ENVIRONMENT: {}", other),
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let host = lookup("API_HOST")
            .map(|host| host.parse::<IpAddr>().with_context(|| format!("Invalid API_HOST: {}", host)))
            .transpose()?;
        let port = lookup("API_PORT")
            .map(|port| port.parse::<u16>().with_context(|| format!("Invalid API_PORT: {}", port)))
            .transpose()?;

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            environment,
            cors_origins,
            host,
            port,
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
        })
    }

    /// Rocket's own configuration with host and port overridden when set.
    pub fn figment(&self) -> Figment {
        let mut figment = rocket::Config::figment();
        if let Some(host) = self.host {
            figment = figment.merge(("address", host));
        }
        if let Some(port) = self.port {
            figment = figment.merge(("port", port));
        }
        figment
    }
}
