// Domain layer: entity models, event routing and simulation rules.

pub mod events;
pub mod ids;
pub mod platform;
pub mod player;
pub mod projectile;
pub mod systems;
pub mod tuning;

pub use events::{EventBus, EventKind, GameEvent, Motion};
pub use platform::Platform;
pub use player::{JumpState, LandingResolver, Player, TickOutcome};
pub use projectile::{HIT_DAMAGE, Projectile};
pub use tuning::{ConfigError, GameConfig};
