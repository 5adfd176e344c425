pub mod config;
pub mod config_loader;
pub mod error;
pub mod logging;

pub use config::*;
pub use config_loader::{ConfigLoadOptions, ConfigLoader, ConfigOverrides, ConfigSection};
pub use error::HelperError;
