// Use cases layer: simulation controllers, client sync and the relay world.

pub mod entry;
pub mod game;
pub mod platforms;
pub mod players;
pub mod ports;
pub mod projectiles;
pub mod relay;
pub mod sync;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use entry::LocalIdentity;
pub use game::GameController;
pub use ports::{EntityView, OutboundSink, ViewFactory};
pub use relay::{RelayWorld, relay_task};
pub use sync::{apply_remote, install_outbound_sync};
pub use types::{
    Direction, InputIntent, Position, Recipients, RelayEvent, RelayOutput, SyncMessage, TickReport,
};
