//! Secure token manager with memory-safe handling and masking capabilities
//!
//! Reads the secret-manager token from the process environment and keeps it
//! wrapped in a `SecretString` so it cannot leak through `Debug` output or logs.

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use std::env;

use super::token_classifier::{ClassificationError, TokenType, classify};

/// Environment variable holding the token unless configured otherwise
pub const DEFAULT_TOKEN_ENV_VAR: &str = "DOPPLER_TOKEN";

/// Secure token manager for the secret-manager token
///
/// # Examples
///
/// ```
/// use ci_helpers::security::SecureTokenManager;
/// use secrecy::ExposeSecret;
///
/// let manager = SecureTokenManager::default();
/// if let Some(token) = manager.get_token() {
///     println!("token found: {}", manager.mask_token(token.expose_secret()));
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SecureTokenManager {
    env_var: String,
}

impl Default for SecureTokenManager {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_ENV_VAR)
    }
}

impl SecureTokenManager {
    /// Creates a manager reading the given environment variable
    pub fn new(env_var: impl Into<String>) -> Self {
        Self {
            env_var: env_var.into(),
        }
    }

    /// Name of the environment variable this manager reads
    pub fn env_var(&self) -> &str {
        &self.env_var
    }

    /// Retrieves the token from the environment
    ///
    /// Returns `None` if the variable is unset or not valid unicode.
    pub fn get_token(&self) -> Option<SecretString> {
        let value = env::var(&self.env_var).ok()?;
        Some(SecretString::new(value.into()))
    }

    /// Reads the token and classifies it
    pub fn classify_token(&self) -> Result<TokenType, ClassificationError> {
        let token = self.get_token();
        let result = classify(token.as_ref().map(|t| t.expose_secret()));

        match (&token, &result) {
            (Some(token), Ok(kind)) => tracing::debug!(
                env_var = %self.env_var,
                token = %self.mask_token(token.expose_secret()),
                kind = %kind,
                "classified token"
            ),
            (Some(token), Err(e)) => tracing::debug!(
                env_var = %self.env_var,
                token = %self.mask_token(token.expose_secret()),
                error = %e,
                "token rejected"
            ),
            (None, _) => tracing::debug!(env_var = %self.env_var, "token not set"),
        }

        result
    }

    /// Masks a token for safe logging
    ///
    /// Shows only the first 3 and last 3 characters for identification purposes.
    /// Tokens shorter than 10 characters are fully masked as "****".
    ///
    /// # Examples
    ///
    /// ```
    /// use ci_helpers::security::SecureTokenManager;
    ///
    /// let manager = SecureTokenManager::default();
    /// assert_eq!(manager.mask_token("dp.pt.123456"), "dp....456");
    /// assert_eq!(manager.mask_token("short"), "****");
    /// ```
    pub fn mask_token(&self, token: &str) -> String {
        if token.len() < 10
            || !token.is_char_boundary(3)
            || !token.is_char_boundary(token.len() - 3)
        {
            return "****".to_string();
        }

        let prefix = &token[..3];
        let suffix = &token[token.len() - 3..];
        format!("{}...{}", prefix, suffix)
    }

    /// Masks every occurrence of the configured token in a string
    ///
    /// Used to sanitize captured command output before it is echoed.
    pub fn mask_tokens_in_string(&self, text: &str) -> String {
        let Some(token) = self.get_token() else {
            return text.to_string();
        };

        let token_str = token.expose_secret();
        if token_str.is_empty() {
            return text.to_string();
        }

        match Regex::new(&regex::escape(token_str)) {
            Ok(regex) => {
                let masked_token = self.mask_token(token_str);
                regex.replace_all(text, masked_token.as_str()).to_string()
            }
            Err(_) => text.to_string(),
        }
    }
}
