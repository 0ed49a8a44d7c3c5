use crate::domain::GameConfig;
use std::{env, path::Path, time::Duration};
use tracing::{error, info};

// Runtime/server constants (not gameplay tuning).

pub fn relay_port() -> u16 {
    env::var("RELAY_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8080)
}

pub fn relay_url() -> String {
    env::var("RELAY_URL").unwrap_or_else(|_| "ws://127.0.0.1:8080/ws".to_string())
}

pub fn reconnect_delay() -> Duration {
    let millis = env::var("RECONNECT_DELAY_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(3000);
    Duration::from_millis(millis)
}

/// Gameplay configuration from the TOML file named by `GAME_CONFIG_PATH`.
///
/// Missing keys fall back to defaults. An unreadable or unparsable file is logged and
/// the defaults are used instead; validation happens when the game is constructed.
pub fn game_config() -> GameConfig {
    match env::var("GAME_CONFIG_PATH") {
        Ok(path) => load_game_config(Path::new(&path)),
        Err(_) => GameConfig::default(),
    }
}

pub fn load_game_config(path: &Path) -> GameConfig {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            error!(
                path = %path.display(),
                error = %e,
                "failed to read game config; using defaults"
            );
            return GameConfig::default();
        }
    };

    match toml::from_str::<GameConfig>(&content) {
        Ok(config) => {
            info!(path = %path.display(), "game config loaded");
            config
        }
        Err(e) => {
            error!(
                path = %path.display(),
                error = %e,
                "failed to parse game config; using defaults"
            );
            GameConfig::default()
        }
    }
}

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;
pub const RELAY_BROADCAST_CAPACITY: usize = 256;

// Client-side queues between the simulation task and the connection task.
pub const OUTBOUND_CHANNEL_CAPACITY: usize = 256;
pub const INBOUND_CHANNEL_CAPACITY: usize = 256;
pub const INTENT_CHANNEL_CAPACITY: usize = 64;

pub const TICK_INTERVAL: Duration = Duration::from_millis(1000 / 60);
