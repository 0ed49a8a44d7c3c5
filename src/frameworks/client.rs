// Framework bootstrap for the headless game client.

use crate::domain::{EventBus, GameConfig};
use crate::frameworks::config;
use crate::interface_adapters::net::{ConnectionSettings, spawn_connection};
use crate::interface_adapters::render::TracingViews;
use crate::use_cases::{Direction, GameController, InputIntent, apply_remote, install_outbound_sync};

use std::io::Result;
use std::rc::Rc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

// Roughly every ten seconds at the default tick rate.
const STATUS_EVERY_TICKS: u64 = 600;

/// Maps one line of text to an intent, accepting key names as well as words.
pub fn parse_intent(line: &str) -> Option<InputIntent> {
    match line.trim().to_ascii_lowercase().as_str() {
        "left" | "arrowleft" | "a" => Some(InputIntent::Move(Direction::Left)),
        "right" | "arrowright" | "d" => Some(InputIntent::Move(Direction::Right)),
        "down" | "arrowdown" | "s" => Some(InputIntent::Move(Direction::Down)),
        "up" | "arrowup" | "jump" | "w" => Some(InputIntent::Jump),
        "fire" | "space" | "f" => Some(InputIntent::Fire),
        "stop" | "release" => Some(InputIntent::Stop),
        _ => None,
    }
}

pub fn connection_settings() -> ConnectionSettings {
    ConnectionSettings {
        url: config::relay_url(),
        reconnect_delay: config::reconnect_delay(),
        outbound_capacity: config::OUTBOUND_CHANNEL_CAPACITY,
        inbound_capacity: config::INBOUND_CHANNEL_CAPACITY,
    }
}

/// Reads intents from stdin, one per line, until EOF.
pub fn spawn_stdin_intents() -> mpsc::Receiver<InputIntent> {
    let (intent_tx, intent_rx) = mpsc::channel(config::INTENT_CHANNEL_CAPACITY);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let Some(intent) = parse_intent(&line) else {
                        if !line.trim().is_empty() {
                            warn!(input = %line.trim(), "unrecognized intent");
                        }
                        continue;
                    };
                    if intent_tx.send(intent).await.is_err() {
                        break;
                    }
                }
                Ok(None) => {
                    info!("stdin closed; no more intents");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "failed to read stdin");
                    break;
                }
            }
        }
    });
    intent_rx
}

/// Runs the simulation on the current task until Ctrl-C or the connection task ends.
///
/// The game controller is single-threaded, so this future must be awaited directly rather
/// than spawned.
pub async fn run_client(
    game_config: GameConfig,
    settings: ConnectionSettings,
    mut intents: mpsc::Receiver<InputIntent>,
) -> Result<()> {
    let bus = Rc::new(EventBus::new());
    let mut game = GameController::new(game_config, bus.clone(), Box::new(TracingViews))
        .map_err(|e| std::io::Error::other(format!("invalid game config: {e}")))?;
    let platforms = game
        .setup_world(&mut rand::rng())
        .map_err(|e| std::io::Error::other(format!("platform generation failed: {e}")))?;
    info!(platforms, "world ready");

    let url = settings.url.clone();
    let (link, mut inbound_rx, connection) = spawn_connection(settings);
    install_outbound_sync(&bus, game.local_identity(), Rc::new(link));
    info!(%url, "client started");

    let mut interval = tokio::time::interval(config::TICK_INTERVAL);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut intents_open = true;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let report = game.tick();
                game.render_pass();
                if report.hits > 0 || report.removed_players > 0 {
                    debug!(
                        tick = report.tick,
                        hits = report.hits,
                        removed = report.removed_players,
                        "combat this tick"
                    );
                }
                if report.tick % STATUS_EVERY_TICKS == 0 {
                    info!(
                        tick = report.tick,
                        players = game.players().len(),
                        projectiles = report.projectiles,
                        local = ?game.local_player_id(),
                        "status"
                    );
                }
            }

            inbound = inbound_rx.recv() => {
                match inbound {
                    Some(message) => apply_remote(&mut game, message),
                    None => {
                        warn!("connection task ended; stopping client");
                        break;
                    }
                }
            }

            intent = intents.recv(), if intents_open => {
                match intent {
                    Some(intent) => game.apply_input(intent),
                    None => intents_open = false,
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested");
                break;
            }
        }
    }

    connection.abort();
    info!(ticks = game.ticks(), "client stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_key_names_or_words_are_given_then_intents_parse() {
        assert_eq!(parse_intent("ArrowLeft"), Some(InputIntent::Move(Direction::Left)));
        assert_eq!(parse_intent("  right "), Some(InputIntent::Move(Direction::Right)));
        assert_eq!(parse_intent("down"), Some(InputIntent::Move(Direction::Down)));
        assert_eq!(parse_intent("ArrowUp"), Some(InputIntent::Jump));
        assert_eq!(parse_intent("space"), Some(InputIntent::Fire));
        assert_eq!(parse_intent("stop"), Some(InputIntent::Stop));
    }

    #[test]
    fn when_input_is_unknown_then_no_intent() {
        assert_eq!(parse_intent(""), None);
        assert_eq!(parse_intent("dance"), None);
    }
}
