use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_GIPHY_API_URL: &str = "https://api.giphy.com/v1/gifs/search";
const DEFAULT_DISCORD_API_URL: &str = "https://discord.com/api/v10";
const DEFAULT_CHANNEL_ID: &str = "1190523991660707921";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub giphy_api_url: String,
    pub giphy_api_key: String,
    pub giphy_query: String,
    pub discord_api_url: String,
    /// Unset means announcements are skipped with a warning.
    pub discord_bot_token: Option<String>,
    pub discord_channel_id: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let port = var("CHEERS_PORT", "3000")
            .parse()
            .context("CHEERS_PORT must be a port number")?;
        let giphy_api_key = get("GIPHY_API_KEY")
            .filter(|k| !k.is_empty())
            .context("GIPHY_API_KEY must be set")?;

        Ok(Self {
            host: var("CHEERS_HOST", "0.0.0.0"),
            port,
            db_path: var("CHEERS_DB_PATH", "congratulatory_messages.db").into(),
            giphy_api_url: var("GIPHY_API_URL", DEFAULT_GIPHY_API_URL),
            giphy_api_key,
            giphy_query: var("GIPHY_QUERY", "celebrate"),
            discord_api_url: var("DISCORD_API_URL", DEFAULT_DISCORD_API_URL),
            discord_bot_token: get("DISCORD_BOT_TOKEN").filter(|t| !t.is_empty()),
            discord_channel_id: var("DISCORD_CHANNEL_ID", DEFAULT_CHANNEL_ID),
        })
    }
}
