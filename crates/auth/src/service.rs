//! The session authenticator
//!
//! `SessionAuthenticator` validates a bearer token, looks the subject up
//! in the principal store, and in strict mode enforces the single-session
//! rule: the token's embedded session tag must equal the tag stored at
//! the principal's most recent login. Requests with no credentials pass
//! through as anonymous; the caller decides what anonymous may do.

use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use fanlog_config::AuthConfig;

use crate::claims::{SessionClaims, LOGOUT_FLAG};
use crate::error::{AuthError, Result};

/// A principal as seen by the authenticator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Principal identifier, matched against the token's subject
    pub subject: String,
    /// Whether the principal may authenticate at all
    pub active: bool,
    /// Session tag stored at the most recent login or logout
    pub login_flag: Option<String>,
}

impl Principal {
    /// An active principal with the given stored session tag
    pub fn active(subject: impl Into<String>, login_flag: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            active: true,
            login_flag: Some(login_flag.into()),
        }
    }
}

/// Source of principal records
pub trait PrincipalStore: Send + Sync {
    /// Look up a principal by token subject
    fn find(&self, subject: &str) -> Option<Principal>;
}

/// An authenticated session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The authenticated principal
    pub principal: Principal,
    /// The validated token claims
    pub claims: SessionClaims,
}

/// Extract the token from an `Authorization: JWT <token>` header value
pub fn bearer_token(header: &str) -> Option<&str> {
    let rest = header.strip_prefix("JWT ").or_else(|| header.strip_prefix("Bearer "))?;
    let token = rest.trim();
    (!token.is_empty()).then_some(token)
}

/// HS256 session token authenticator
pub struct SessionAuthenticator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    store: Arc<dyn PrincipalStore>,
    strict_login: bool,
}

impl SessionAuthenticator {
    /// Authenticator over the given signing secret and principal store
    pub fn new(secret: &[u8], store: Arc<dyn PrincipalStore>, config: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
            store,
            strict_login: config.strict_login,
        }
    }

    /// Sign a token for the given claims
    ///
    /// # Errors
    ///
    /// Returns `InvalidToken` when signing fails.
    pub fn issue(&self, claims: &SessionClaims) -> Result<String> {
        Ok(encode(&Header::new(Algorithm::HS256), claims, &self.encoding)?)
    }

    /// Authenticate an optional `Authorization` header value
    ///
    /// `None` (and a header without a recognized scheme) authenticates as
    /// anonymous: `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns the token, principal, and session errors from
    /// [`authenticate_token`](Self::authenticate_token).
    pub fn authenticate(&self, header: Option<&str>) -> Result<Option<Session>> {
        match header.and_then(bearer_token) {
            Some(token) => self.authenticate_token(token).map(Some),
            None => Ok(None),
        }
    }

    /// Authenticate a bare token
    ///
    /// # Errors
    ///
    /// `InvalidToken` on signature or expiry failure, `UnknownPrincipal`
    /// and `PrincipalDisabled` from the store lookup, and in strict mode
    /// `SessionLoggedOut` or `SessionDisplaced` when the stored session
    /// tag no longer matches the token's.
    pub fn authenticate_token(&self, token: &str) -> Result<Session> {
        let claims = decode::<SessionClaims>(token, &self.decoding, &self.validation)?.claims;

        let principal = self
            .store
            .find(&claims.sub)
            .ok_or_else(|| AuthError::unknown_principal(&claims.sub))?;
        if !principal.active {
            return Err(AuthError::principal_disabled(&claims.sub));
        }

        if self.strict_login {
            let stored = principal.login_flag.as_deref();
            if stored != Some(claims.login_flag.as_str()) {
                tracing::debug!(
                    subject = %claims.sub,
                    stored = stored.unwrap_or("<none>"),
                    "single-session check rejected token"
                );
                return Err(if stored == Some(LOGOUT_FLAG) {
                    AuthError::SessionLoggedOut
                } else {
                    AuthError::SessionDisplaced
                });
            }
        }

        Ok(Session { principal, claims })
    }
}

#[cfg(test)]
#[path = "service_test.rs"]
mod service_test;
