// Interface adapters: wire protocol, network handling and headless views.

pub mod net;
pub mod protocol;
pub mod render;
pub mod state;
