//! Inbound request authentication.
//!
//! Production deployments verify every request with a
//! [`SignatureVerifier`]. Trusted mode skips verification and must be
//! chosen explicitly; a missing secret outside trusted mode is a startup
//! error.

mod signature;

pub use signature::{MAX_REQUEST_AGE_SECS, SignatureVerifier};

use std::fmt;

use mockable::{Clock, DefaultClock};
use thiserror::Error;

/// Header carrying the request timestamp in seconds.
pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";

/// Header carrying the `v0=` request signature.
pub const SIGNATURE_HEADER: &str = "x-slack-signature";

/// How inbound requests are authenticated.
pub enum Authenticator<C = DefaultClock> {
    /// Every request must carry a valid signature.
    Verified(SignatureVerifier<C>),
    /// Signatures are not checked. For local development only.
    Trusted,
}

impl<C> Clone for Authenticator<C> {
    fn clone(&self) -> Self {
        match self {
            Self::Verified(verifier) => Self::Verified(verifier.clone()),
            Self::Trusted => Self::Trusted,
        }
    }
}

impl<C> fmt::Debug for Authenticator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verified(verifier) => f.debug_tuple("Verified").field(verifier).finish(),
            Self::Trusted => f.write_str("Trusted"),
        }
    }
}

/// No signing secret was configured outside trusted mode.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("a signing secret is required unless trusted development mode is enabled")]
pub struct MissingSigningSecret;

impl Authenticator {
    /// Chooses the authenticator for the given settings.
    ///
    /// # Errors
    ///
    /// Returns [`MissingSigningSecret`] when `trusted` is false and no
    /// non-empty secret is configured.
    pub fn from_settings(
        trusted: bool,
        secret: Option<&str>,
    ) -> Result<Self, MissingSigningSecret> {
        if trusted {
            tracing::warn!("request signature verification is disabled");
            return Ok(Self::Trusted);
        }
        secret
            .filter(|value| !value.is_empty())
            .map(|value| Self::Verified(SignatureVerifier::new(value)))
            .ok_or(MissingSigningSecret)
    }
}

impl<C> Authenticator<C>
where
    C: Clock + Send + Sync,
{
    /// Returns `true` if the request may proceed.
    #[must_use]
    pub fn authenticate(
        &self,
        body: &[u8],
        timestamp: Option<&str>,
        signature: Option<&str>,
    ) -> bool {
        match self {
            Self::Verified(verifier) => verifier.is_valid(body, timestamp, signature),
            Self::Trusted => true,
        }
    }
}
