//! Session token claims

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

/// Stored session tag meaning the principal logged out explicitly
pub const LOGOUT_FLAG: &str = "logout";

/// Claims embedded in every session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Principal identifier
    pub sub: String,
    /// Session tag assigned at login; compared against the principal's
    /// stored tag in strict mode
    pub login_flag: String,
    /// Expiry, seconds since the epoch
    pub exp: i64,
    /// Issued-at, seconds since the epoch
    pub iat: i64,
}

impl SessionClaims {
    /// Claims for a fresh login, valid for `ttl`
    pub fn new(subject: impl Into<String>, login_flag: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: subject.into(),
            login_flag: login_flag.into(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }
}
