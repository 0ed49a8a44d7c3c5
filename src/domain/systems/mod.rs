// Collision and platform engine.

pub mod platforms;
pub mod projectiles;

pub use platforms::GenerationError;
pub use projectiles::{ProjectileFate, ProjectileHit};
