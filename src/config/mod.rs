pub mod config;

pub use config::{CONFIG, Config};
