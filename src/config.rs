use std::env;
use std::str::FromStr;

use url::Url;

/// Deployment stage the process runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Preview,
    Canary,
    Production,
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Self::Development),
            "preview" => Ok(Self::Preview),
            "canary" => Ok(Self::Canary),
            "production" => Ok(Self::Production),
            other => Err(anyhow::anyhow!(
                "ENVIRONMENT must be one of development|preview|canary|production, got {other:?}"
            )),
        }
    }
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Preview => "preview",
            Self::Canary => "canary",
            Self::Production => "production",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Origin the web app is served from; CORS is restricted to it.
    pub base_url: Url,
    /// API base the web client is built against.
    pub public_api_url: Url,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".into())
                .parse()?,
            database_url: required("DATABASE_URL")?,
            base_url: parse_url("BASE_URL")?,
            public_api_url: parse_url("PUBLIC_API_URL")?,
            environment: required("ENVIRONMENT")?.parse()?,
        })
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).map_err(|_| anyhow::anyhow!("Missing required env var: {}", key))
}

fn parse_url(key: &str) -> anyhow::Result<Url> {
    let raw = required(key)?;
    Url::parse(&raw).map_err(|e| anyhow::anyhow!("{} is not a valid URL: {}", key, e))
}
