// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod key_listener;
pub mod keyboard;
pub mod runtime;
pub mod session;
pub mod sound;
pub mod ui;
