//! Order Settings

pub mod records;
mod repository;
pub mod service;
pub mod watch;

pub use service::*;
pub use watch::SettingsWatcher;
