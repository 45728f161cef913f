//! Caller identity.

use serde::{Deserialize, Serialize};

use crate::errors::BoardError;

/// Opaque caller identity issued by the authentication layer in front of the
/// service. Treated as a stable key; no structure is assumed beyond being a
/// non-empty token without whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    /// Create a principal from a raw token
    pub fn new(raw: impl Into<String>) -> Result<Self, BoardError> {
        let raw = raw.into();
        if raw.is_empty() || raw.chars().any(char::is_whitespace) {
            return Err(BoardError::InvalidPrincipal { principal: raw });
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Principal {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_roundtrip() {
        let p = Principal::new("w3gef-owri2-aaaaa").unwrap();
        assert_eq!(p.as_str(), "w3gef-owri2-aaaaa");
        assert_eq!(p.to_string(), "w3gef-owri2-aaaaa");
    }

    #[test]
    fn test_principal_rejects_empty() {
        assert!(Principal::new("").is_err());
    }

    #[test]
    fn test_principal_rejects_whitespace() {
        assert!(Principal::new("a b").is_err());
        assert!("a\tb".parse::<Principal>().is_err());
    }

    #[test]
    fn test_principal_serde_is_bare_string() {
        let p = Principal::new("alice-principal").unwrap();
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"alice-principal\"");
        let back: Principal = serde_json::from_str("\"alice-principal\"").unwrap();
        assert_eq!(back, p);
    }
}
