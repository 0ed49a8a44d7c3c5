// Network adapter modules split by the relay endpoint vs the client connection.

use std::time::{Duration, Instant};

pub mod client;
pub mod relay;

pub use client::{ConnectionSettings, ConnectionState, NetworkLink, spawn_connection};
pub use relay::{relay_output_serializer, ws_handler};

pub(crate) const LOG_THROTTLE: Duration = Duration::from_secs(2);

/// Rate-limits a repeated warning; `last` is the time it was last emitted.
pub(crate) fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}
