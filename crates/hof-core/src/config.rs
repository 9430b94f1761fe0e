use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{domain::GuildId, errors::Error, Result};

/// Typed configuration, loaded once at startup from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    pub discord_bot_token: String,
    pub guild_ids: Vec<GuildId>,
    pub channel_store: PathBuf,
    pub embed_field_limit: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let discord_bot_token = env_str("DISCORD_BOT_TOKEN").unwrap_or_default();
        if discord_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "DISCORD_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let guild_ids = parse_csv_u64(env_str("DISCORD_GUILD_IDS"))
            .into_iter()
            .map(GuildId)
            .collect::<Vec<_>>();
        if guild_ids.is_empty() {
            return Err(Error::Config(
                "DISCORD_GUILD_IDS environment variable is required".to_string(),
            ));
        }

        let channel_store = env_path("CHANNEL_STORE")
            .unwrap_or_else(|| PathBuf::from("guild-channels.json"));
        if let Some(parent) = channel_store.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let embed_field_limit = env_usize("EMBED_FIELD_LIMIT").unwrap_or(2000);
        if embed_field_limit < 2 {
            return Err(Error::Config(
                "EMBED_FIELD_LIMIT must be at least 2".to_string(),
            ));
        }

        Ok(Self {
            discord_bot_token,
            guild_ids,
            channel_store,
            embed_field_limit,
        })
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_usize(key: &str) -> Option<usize> {
    env_str(key).and_then(|s| s.trim().parse::<usize>().ok())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).map(PathBuf::from)
}

fn parse_csv_u64(v: Option<String>) -> Vec<u64> {
    v.unwrap_or_default()
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<u64>().ok())
        .collect()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}
