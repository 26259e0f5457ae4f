//! Identity-provider boundary.
//!
//! Token acquisition and refresh belong to the external identity provider
//! (a hosted user pool in production); this crate only defines the seam
//! the transport uses to attach a bearer credential to every request.

use std::sync::Mutex;

use tracing::info;

use crate::error::{ClientError, Result};

/// Sign-in input handed to the external provider.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// The authenticated principal as the app sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Stable subject identifier from the token claims.
    pub subject: String,
}

/// An established sign-in: who, plus the bearer token the transport sends.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub identity: Identity,
    pub bearer_token: String,
}

/// The identity seam consumed by the data-service transport.
pub trait IdentityProvider {
    /// Establish a session with the external provider.
    fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession>;

    /// The current principal, or [`ClientError::NotAuthenticated`] when
    /// signed out.
    fn current_user(&self) -> Result<Identity>;

    /// The bearer credential for the next request, or
    /// [`ClientError::NotAuthenticated`] when signed out.
    fn bearer_token(&self) -> Result<String>;

    fn sign_out(&self);
}

/// Holds a token obtained out-of-band.
///
/// The app receives its token from the external provider's own flow; this
/// impl just keeps it in memory for the transport. It cannot mint new
/// sessions, so `sign_in` reports that the flow is delegated.
#[derive(Debug, Default)]
pub struct StaticTokenProvider {
    session: Mutex<Option<AuthSession>>,
}

impl StaticTokenProvider {
    /// A signed-out provider.
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// A provider already holding a session token.
    pub fn with_token(subject: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            session: Mutex::new(Some(AuthSession {
                identity: Identity {
                    subject: subject.into(),
                },
                bearer_token: token.into(),
            })),
        }
    }
}

impl IdentityProvider for StaticTokenProvider {
    fn sign_in(&self, _credentials: &Credentials) -> Result<AuthSession> {
        Err(ClientError::Identity(
            "sign-in is delegated to the external identity provider; \
             construct this provider with a token"
                .to_string(),
        ))
    }

    fn current_user(&self) -> Result<Identity> {
        self.session
            .lock()
            .map_err(|_| ClientError::Identity("identity lock poisoned".to_string()))?
            .as_ref()
            .map(|session| session.identity.clone())
            .ok_or(ClientError::NotAuthenticated)
    }

    fn bearer_token(&self) -> Result<String> {
        self.session
            .lock()
            .map_err(|_| ClientError::Identity("identity lock poisoned".to_string()))?
            .as_ref()
            .map(|session| session.bearer_token.clone())
            .ok_or(ClientError::NotAuthenticated)
    }

    fn sign_out(&self) {
        if let Ok(mut guard) = self.session.lock() {
            if guard.take().is_some() {
                info!("signed out");
            }
        }
    }
}
