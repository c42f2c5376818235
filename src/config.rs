use std::path::PathBuf;

use anyhow::{Context, Result};
use poise::serenity_prelude as serenity;

pub struct BotConfig {
    pub token: String,
    /// Register commands to this guild only (instant) instead of globally.
    pub guild_id: Option<serenity::GuildId>,
    pub data_dir: PathBuf,
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        let token = dotenv::var("DISCORD_TOKEN").context("DISCORD_TOKEN required")?;
        let guild_id = dotenv::var("DISCORD_GUILD_ID")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(serenity::GuildId::new);
        let data_dir = dotenv::var("JOKEGEN_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data/cookies"));

        Ok(Self {
            token,
            guild_id,
            data_dir,
        })
    }
}
