//! Server configuration parsed from environment variables.
//!
//! `.env` is loaded by `main` before anything here runs. Generation
//! credentials live with their clients (`fal::FalConfig`, `llm::config`).

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

pub const DEFAULT_PORT: u16 = 3002;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://canvas.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub database_url: String,
}

impl ServerConfig {
    /// - `PORT`: listen port, default 3002
    /// - `DATABASE_URL`: SQLite URL, default `sqlite://canvas.db`
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            port: parse_or(lookup("PORT"), DEFAULT_PORT),
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
        }
    }
}

/// Parse `key` as `T`, falling back to `default` when unset or malformed.
pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    parse_or(std::env::var(key).ok(), default)
}

pub(crate) fn parse_or<T>(raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr,
{
    raw.and_then(|v| v.trim().parse::<T>().ok()).unwrap_or(default)
}
