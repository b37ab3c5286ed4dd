// Effect-layer logic is target independent so it can be tested on the host.
pub mod content;
pub mod logging;
pub mod magnet;
pub mod reveal;
pub mod scroll;
pub mod theme;

#[cfg(target_arch = "wasm32")]
pub mod frontend;

#[cfg(not(target_arch = "wasm32"))]
pub mod server;
