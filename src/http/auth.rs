//! Shared-secret bearer token check.

use super::error::ApiError;

/// Accepts exactly one credential: `Bearer <token>`.
#[derive(Debug, Clone)]
pub struct AuthGate {
    expected: String,
}

impl AuthGate {
    pub fn new(token: &str) -> Self {
        Self {
            expected: format!("Bearer {}", token),
        }
    }

    /// Validate an `Authorization` header value, returning it as the
    /// caller's identifier on success.
    pub fn verify<'a>(&self, header: Option<&'a str>) -> Result<&'a str, ApiError> {
        match header {
            Some(value) if value == self.expected => Ok(value),
            _ => Err(ApiError::Unauthorized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_accepted() {
        let gate = AuthGate::new("mysecrettoken");
        assert_eq!(
            gate.verify(Some("Bearer mysecrettoken")).unwrap(),
            "Bearer mysecrettoken"
        );
    }

    #[test]
    fn test_mismatches_rejected() {
        let gate = AuthGate::new("mysecrettoken");
        assert!(gate.verify(None).is_err());
        assert!(gate.verify(Some("mysecrettoken")).is_err());
        assert!(gate.verify(Some("Bearer mysecrettoken ")).is_err());
        assert!(gate.verify(Some("bearer mysecrettoken")).is_err());
        assert!(gate.verify(Some("Bearer other")).is_err());
    }
}
