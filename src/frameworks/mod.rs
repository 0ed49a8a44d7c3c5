// Frameworks layer: configuration and runtime bootstrap for the relay and the client.

pub mod client;
pub mod config;
pub mod server;
