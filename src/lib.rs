pub mod core;
pub mod project;
pub mod release;
pub mod security;

pub use crate::core::{
    ConfigLoadOptions, ConfigLoader, ConfigOverrides, ConfigSection, HelperConfig, HelperError,
};
pub use project::{AppTypeDetector, ProjectLocation, ProjectLocator, detect_app_types};
pub use release::{GhCliBackend, InitialRelease, NewRelease, ReleaseBackend, ReleaseOutcome};
pub use security::{
    ClassificationError, CommandError, SafeCommandExecutor, SecureTokenManager, TokenType,
    classify,
};
