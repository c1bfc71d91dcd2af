use serde::{Deserialize, Serialize};

use crate::token::AccessToken;

/// Authentication status reported by the session source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// The session source has not resolved yet.
    Loading,
    Authenticated,
    Unauthenticated,
}

/// Session supplied by the external authentication provider.
///
/// Read-only for the access-control layer; it never authenticates users
/// itself.
#[derive(Debug, Clone)]
pub struct Session {
    status: SessionStatus,
    user_id: Option<String>,
    role: Option<String>,
    access_token: Option<AccessToken>,
}

impl Session {
    /// Session whose status is still being resolved.
    #[must_use]
    pub fn loading() -> Self {
        Self {
            status: SessionStatus::Loading,
            user_id: None,
            role: None,
            access_token: None,
        }
    }

    #[must_use]
    pub fn unauthenticated() -> Self {
        Self {
            status: SessionStatus::Unauthenticated,
            ..Self::loading()
        }
    }

    /// Authenticated session for `user_id` with the provider-issued token.
    #[must_use]
    pub fn authenticated(user_id: impl Into<String>, access_token: AccessToken) -> Self {
        Self {
            status: SessionStatus::Authenticated,
            user_id: Some(user_id.into()),
            role: None,
            access_token: Some(access_token),
        }
    }

    /// Attach the provider's primary role string.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    #[must_use]
    pub fn access_token(&self) -> Option<&AccessToken> {
        self.access_token.as_ref()
    }

    /// Token usable for backend calls: present, non-blank, and the session is
    /// authenticated.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&AccessToken> {
        if self.status != SessionStatus::Authenticated {
            return None;
        }
        self.access_token.as_ref().filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn authenticated_session_exposes_token() {
        let session = Session::authenticated("42", AccessToken::new("tok")).with_role("admin");
        assert_eq!(session.status(), SessionStatus::Authenticated);
        assert_eq!(session.user_id(), Some("42"));
        assert_eq!(session.role(), Some("admin"));
        assert_eq!(session.bearer_token().map(AccessToken::expose), Some("tok"));
    }

    #[test]
    fn blank_token_is_not_a_bearer_token() {
        let session = Session::authenticated("42", AccessToken::new(""));
        assert!(session.bearer_token().is_none());
        assert!(session.access_token().is_some());
    }

    #[test]
    fn unauthenticated_has_no_token() {
        let session = Session::unauthenticated();
        assert_eq!(session.status(), SessionStatus::Unauthenticated);
        assert!(session.bearer_token().is_none());
        assert!(session.user_id().is_none());
    }

    #[test]
    fn status_uses_lowercase_wire_names() {
        let json = serde_json::to_string(&SessionStatus::Unauthenticated).unwrap();
        assert_eq!(json, r#""unauthenticated""#);
        let status: SessionStatus = serde_json::from_str(r#""loading""#).unwrap();
        assert_eq!(status, SessionStatus::Loading);
    }
}
