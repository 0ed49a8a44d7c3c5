use std::{
    sync::{
        OnceLock,
        atomic::{AtomicU64, Ordering},
    },
    time::{SystemTime, UNIX_EPOCH},
};

fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}

/// Returns a process-unique, monotonically increasing stamp seeded from the wall clock.
///
/// Entity ids are built from this so two entities created in the same instant
/// (e.g. a burst of projectiles from one owner) never share an id.
pub fn next_stamp() -> u64 {
    static COUNTER: OnceLock<AtomicU64> = OnceLock::new();
    let counter = COUNTER.get_or_init(|| AtomicU64::new(now_nanos()));
    counter.fetch_add(1, Ordering::Relaxed)
}

pub fn projectile_id(owner_id: &str) -> String {
    format!("{owner_id}-{}", next_stamp())
}

pub fn platform_id() -> String {
    format!("platform-{}", next_stamp())
}

pub fn player_id() -> String {
    format!("player-{}", next_stamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_stamps_are_drawn_back_to_back_then_they_strictly_increase() {
        let a = next_stamp();
        let b = next_stamp();
        assert!(b > a);
    }

    #[test]
    fn when_same_owner_fires_twice_then_projectile_ids_differ() {
        let first = projectile_id("player-1");
        let second = projectile_id("player-1");
        assert_ne!(first, second);
        assert!(first.starts_with("player-1-"));
    }
}
