pub mod ai;
pub mod config;
pub mod fetch;
pub mod logging;
pub mod process;
pub mod server;
