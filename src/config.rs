//! Process configuration, read once at startup

use std::fmt;
use std::net::SocketAddr;

/// Where the server is deployed; controls provider listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentEnv {
    /// Hosted deployment; local-only providers are hidden
    Cloud,
    /// Developer machine / self-hosted
    Local,
}

impl DeploymentEnv {
    /// Parse the `DEPLOYMENT_ENV` value; anything but `cloud` is local
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("cloud") {
            DeploymentEnv::Cloud
        } else {
            DeploymentEnv::Local
        }
    }
}

impl fmt::Display for DeploymentEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentEnv::Cloud => write!(f, "cloud"),
            DeploymentEnv::Local => write!(f, "local"),
        }
    }
}

/// Environment-derived application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Postgres connection string
    pub database_url: String,

    /// Credential for the model provider
    pub google_api_key: String,

    /// Deployment environment flag
    pub deployment_env: DeploymentEnv,

    /// Listen address
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    /// Read configuration from the environment.
    ///
    /// `DATABASE_URL` and `GOOGLE_API_KEY` are required; `DEPLOYMENT_ENV`
    /// defaults to local and `BIND_ADDR` to 127.0.0.1:3030.
    pub fn from_env() -> Result<Self, String> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL is not set".to_string())?;
        let google_api_key =
            std::env::var("GOOGLE_API_KEY").map_err(|_| "GOOGLE_API_KEY is not set".to_string())?;

        let deployment_env = std::env::var("DEPLOYMENT_ENV")
            .map(|v| DeploymentEnv::parse(&v))
            .unwrap_or(DeploymentEnv::Local);

        let bind_addr = match std::env::var("BIND_ADDR") {
            Ok(addr) => addr
                .parse()
                .map_err(|e| format!("Invalid BIND_ADDR: {}", e))?,
            Err(_) => SocketAddr::from(([127, 0, 0, 1], 3030)),
        };

        Ok(Self {
            database_url,
            google_api_key,
            deployment_env,
            bind_addr,
        })
    }
}
