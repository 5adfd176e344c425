//! Token Classifier - Determines the kind of a secret-manager access token
//!
//! Tokens have the shape `dp.<type>.<secret>`: a fixed `dp` prefix, a
//! two-letter type code in the second `.`-delimited segment, and the secret
//! material after that.
//!
//! # Example
//!
//! ```
//! use ci_helpers::security::token_classifier::{classify, TokenType};
//!
//! assert_eq!(classify(Some("dp.st.abcdef")).unwrap(), TokenType::ServiceToken);
//! assert!(classify(None).is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Literal prefix every well-formed token begins with
pub const TOKEN_PREFIX: &str = "dp";

/// Segment delimiter
pub const SEGMENT_DELIMITER: char = '.';

/// Minimum number of `.`-delimited segments in a well-formed token
pub const MIN_SEGMENTS: usize = 3;

/// Credential category encoded in a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    PersonalToken,
    ServiceToken,
    ServiceAccountToken,
}

impl TokenType {
    /// Label printed for the surrounding workflow
    pub fn label(&self) -> &'static str {
        match self {
            Self::PersonalToken => "personal_token",
            Self::ServiceToken => "service_token",
            Self::ServiceAccountToken => "service_account",
        }
    }

    /// Two-letter type code carried in the token's second segment
    pub fn code(&self) -> &'static str {
        match self {
            Self::PersonalToken => "pt",
            Self::ServiceToken => "st",
            Self::ServiceAccountToken => "sa",
        }
    }

    /// Resolve a type code, `None` if it is not one of the known codes
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "pt" => Some(Self::PersonalToken),
            "st" => Some(Self::ServiceToken),
            "sa" => Some(Self::ServiceAccountToken),
            _ => None,
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a token could not be classified
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassificationError {
    /// Token is unset or empty
    #[error("token is not set")]
    MissingToken,

    /// Prefix or segment structure is wrong
    #[error("token is not a valid token: {reason}")]
    InvalidFormat { reason: String },

    /// Structure is fine but the type code is unknown
    #[error("token has an unrecognized type code '{code}'")]
    UnrecognizedType { code: String },
}

/// Classify a raw token string.
///
/// The value is passed in rather than read from the environment so the
/// classification stays a pure function of its input.
pub fn classify(raw: Option<&str>) -> Result<TokenType, ClassificationError> {
    let raw = match raw {
        Some(value) if !value.is_empty() => value,
        _ => return Err(ClassificationError::MissingToken),
    };

    if !raw.starts_with(TOKEN_PREFIX) {
        return Err(ClassificationError::InvalidFormat {
            reason: format!("must start with '{}'", TOKEN_PREFIX),
        });
    }

    let segments: Vec<&str> = raw.split(SEGMENT_DELIMITER).collect();
    if segments.len() < MIN_SEGMENTS {
        return Err(ClassificationError::InvalidFormat {
            reason: format!(
                "expected at least {} '{}'-delimited segments, found {}",
                MIN_SEGMENTS,
                SEGMENT_DELIMITER,
                segments.len()
            ),
        });
    }

    let code = segments[1];
    TokenType::from_code(code).ok_or_else(|| ClassificationError::UnrecognizedType {
        code: code.to_string(),
    })
}
