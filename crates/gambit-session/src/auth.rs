//! Authentication hook for validating participant identity.
//!
//! Gambit doesn't register users or issue real credentials itself; that
//! belongs to whatever account service fronts it. Instead it defines the
//! [`Authenticator`] trait: one async method that takes the opaque
//! `authToken` a client sent and returns an [`Identity`], or fails with
//! [`SessionError::InvalidCredential`].
//!
//! [`TokenAuthenticator`] is a small in-memory implementation, good for
//! tests, demos, and a single-process deployment.

use std::collections::HashMap;

use gambit_protocol::Identity;
use rand::Rng;
use tokio::sync::RwLock;

use crate::SessionError;

/// Validates a client's credential and returns their identity.
///
/// Called for every command a client sends, so implementations should be
/// cheap or cache internally.
///
/// # Example
///
/// ```rust
/// use gambit_protocol::Identity;
/// use gambit_session::{Authenticator, SessionError};
///
/// /// Treats the token itself as the username. Development only!
/// struct TrustingAuthenticator;
///
/// impl Authenticator for TrustingAuthenticator {
///     async fn authenticate(&self, token: &str) -> Result<Identity, SessionError> {
///         if token.is_empty() {
///             return Err(SessionError::InvalidCredential);
///         }
///         Ok(Identity::new(token))
///     }
/// }
/// ```
pub trait Authenticator: Send + Sync + 'static {
    /// Validates `token` and returns who it belongs to.
    ///
    /// # Errors
    /// [`SessionError::InvalidCredential`] if the token is not accepted.
    fn authenticate(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<Identity, SessionError>> + Send;
}

// ---------------------------------------------------------------------------
// TokenAuthenticator
// ---------------------------------------------------------------------------

/// An in-memory registry of issued bearer tokens.
///
/// Tokens are random 128-bit values rendered as 32 lowercase hex
/// characters. One identity may hold any number of tokens.
#[derive(Debug, Default)]
pub struct TokenAuthenticator {
    tokens: RwLock<HashMap<String, Identity>>,
}

impl TokenAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a fresh token for `identity`.
    pub async fn issue(&self, identity: Identity) -> String {
        let token = generate_token();
        tracing::info!(%identity, "credential issued");
        self.tokens.write().await.insert(token.clone(), identity);
        token
    }

    /// Invalidates `token`. Returns `false` if it was not known.
    pub async fn revoke(&self, token: &str) -> bool {
        let removed = self.tokens.write().await.remove(token);
        if let Some(identity) = &removed {
            tracing::info!(%identity, "credential revoked");
        }
        removed.is_some()
    }
}

impl Authenticator for TokenAuthenticator {
    async fn authenticate(&self, token: &str) -> Result<Identity, SessionError> {
        self.tokens
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or(SessionError::InvalidCredential)
    }
}

/// Generates a random 32-character hex string (128 bits of entropy).
fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
