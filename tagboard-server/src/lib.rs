// Library exports for tagboard-server
// This allows the CLI and integration tests to use the server modules

pub mod api;
pub mod config;
pub mod hashtag;
pub mod state;
