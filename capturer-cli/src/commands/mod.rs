//! CLI command implementations

mod config;
mod host;
mod pick;
mod terminal;

pub use config::{config, ConfigArgs};
pub use host::{host, HostArgs};
pub use pick::{pick, PickArgs};
