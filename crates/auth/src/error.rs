//! Authentication error types

use thiserror::Error;

/// Result type for authentication operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Authentication failures
///
/// The two session-mismatch variants carry deliberately distinct
/// messages: a caller holding a logged-out token and a caller displaced
/// by a newer login are told different things.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token failed signature, structure, or expiry validation
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    /// The token's session tag was revoked by an explicit logout
    #[error("token has been invalidated")]
    SessionLoggedOut,

    /// A newer login replaced the token's session tag
    #[error("account logged in elsewhere")]
    SessionDisplaced,

    /// The token's subject is not a known principal
    #[error("unknown principal '{subject}'")]
    UnknownPrincipal {
        /// Subject claim of the rejected token
        subject: String,
    },

    /// The principal is known but may not authenticate
    #[error("principal '{subject}' is disabled")]
    PrincipalDisabled {
        /// Subject claim of the rejected token
        subject: String,
    },
}

impl AuthError {
    /// Create an UnknownPrincipal error
    pub fn unknown_principal(subject: impl Into<String>) -> Self {
        Self::UnknownPrincipal {
            subject: subject.into(),
        }
    }

    /// Create a PrincipalDisabled error
    pub fn principal_disabled(subject: impl Into<String>) -> Self {
        Self::PrincipalDisabled {
            subject: subject.into(),
        }
    }
}
