use std::{fmt, time::Instant};

/// Opaque, time-limited authorization token.
///
/// `expires_at` is the validity window enforced by the credential cache,
/// not necessarily the expiry reported by the issuer.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    expires_at: Instant,
}

impl Credential {
    /// Create a credential valid until `expires_at`.
    pub fn new(token: impl Into<String>, expires_at: Instant) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Raw token value.
    #[inline]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Instant after which the credential must not be handed out.
    #[inline]
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// Returns `true` if the credential is still valid at `now`.
    #[inline]
    pub fn is_valid_at(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

// Token is a bearer secret: never print it.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::Credential;

    #[test]
    fn validity_is_strictly_before_expiry() {
        let now = Instant::now();
        let cred = Credential::new("abc", now + Duration::from_secs(300));

        assert!(cred.is_valid_at(now));
        assert!(cred.is_valid_at(now + Duration::from_secs(299)));
        assert!(!cred.is_valid_at(now + Duration::from_secs(300)));
        assert!(!cred.is_valid_at(now + Duration::from_secs(301)));
    }

    #[test]
    fn debug_redacts_token() {
        let cred = Credential::new("k8s-aws-v1.secret", Instant::now());
        let s = format!("{cred:?}");
        assert!(!s.contains("secret"));
        assert!(s.contains("<redacted>"));
    }
}
