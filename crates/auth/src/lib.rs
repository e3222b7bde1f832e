//! Fanlog - Auth
//!
//! Single-session JWT authentication. Every issued token embeds a session
//! tag; the principal store keeps the tag of the most recent login. In
//! strict mode a token is only accepted while its embedded tag still
//! matches the stored one, so a later login (or an explicit logout)
//! invalidates every token issued before it.

/// Token claims
pub mod claims;

/// The authenticator and its collaborator traits
pub mod service;

mod error;

pub use claims::{SessionClaims, LOGOUT_FLAG};
pub use error::{AuthError, Result};
pub use service::{bearer_token, Principal, PrincipalStore, Session, SessionAuthenticator};
