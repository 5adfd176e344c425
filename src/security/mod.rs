pub mod command_executor;
pub mod token_classifier;
pub mod token_manager;

pub use command_executor::{CommandError, SafeCommandExecutor};
pub use token_classifier::{ClassificationError, TokenType, classify};
pub use token_manager::SecureTokenManager;
