pub mod charts;
pub mod config;
pub mod error;
pub mod html;
pub mod loader;
pub mod logging;
pub mod models;
pub mod server;
pub mod stats;
