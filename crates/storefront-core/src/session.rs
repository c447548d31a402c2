//! # Session Slice
//!
//! Authentication state and the pure transitions on it.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Anonymous ── begin_authentication ──► Authenticating                  │
//! │                                            │                            │
//! │              complete_authentication ◄─────┴─────► fail_authentication  │
//! │                         │                                │              │
//! │                         ▼                                ▼              │
//! │                  Authenticated                      AuthFailed          │
//! │                         │                                │              │
//! │                   reset │          retry (begin) ◄───────┤              │
//! │                         ▼                                │ clear_error  │
//! │                     Anonymous ◄──────────────────────────┘              │
//! │                                                                         │
//! │   Anonymous ── restore(Some(token)) ──► Authenticated                   │
//! │   (launch path, no Authenticating step)                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `AuthPhase` is derived from the fields rather than stored, so it can never
//! disagree with them. Every transition keeps `is_authenticated` true exactly
//! when `token` holds a non-empty string.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{AuthPayload, UserProfile};
use crate::LOGIN_FAILED_MESSAGE;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AuthPhase {
    Anonymous,
    Authenticating,
    Authenticated,
    AuthFailed,
}

/// Session slice of the composite state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub profile: Option<UserProfile>,
    pub pending: bool,
    pub last_error: Option<String>,
}

impl Session {
    /// Current lifecycle phase.
    pub fn phase(&self) -> AuthPhase {
        if self.pending {
            AuthPhase::Authenticating
        } else if self.is_authenticated {
            AuthPhase::Authenticated
        } else if self.last_error.is_some() {
            AuthPhase::AuthFailed
        } else {
            AuthPhase::Anonymous
        }
    }

    /// Credentials were submitted.
    pub fn begin_authentication(&mut self) {
        self.pending = true;
        self.last_error = None;
    }

    /// The gateway accepted the credentials.
    ///
    /// A payload with an empty token cannot authenticate anything and is
    /// committed as a failure.
    pub fn complete_authentication(&mut self, payload: &AuthPayload) {
        if payload.access_token.is_empty() {
            self.fail_authentication(LOGIN_FAILED_MESSAGE);
            return;
        }
        self.token = Some(payload.access_token.clone());
        self.is_authenticated = true;
        self.profile = Some(payload.profile());
        self.pending = false;
        self.last_error = None;
    }

    /// The gateway rejected the credentials or could not be reached.
    pub fn fail_authentication(&mut self, message: impl Into<String>) {
        self.token = None;
        self.is_authenticated = false;
        self.profile = None;
        self.pending = false;
        self.last_error = Some(message.into());
    }

    /// Applies the token read from the durable store at launch.
    ///
    /// `Some("")` is treated exactly like `None`. The profile is never
    /// persisted, so it is cleared either way. Errors are left alone.
    pub fn restore(&mut self, token: Option<String>) {
        match token.filter(|t| !t.is_empty()) {
            Some(token) => {
                self.token = Some(token);
                self.is_authenticated = true;
            }
            None => {
                self.token = None;
                self.is_authenticated = false;
            }
        }
        self.profile = None;
    }

    /// Back to the empty initial shape.
    pub fn reset(&mut self) {
        *self = Session::default();
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// True when `is_authenticated` agrees with the token.
    pub fn is_consistent(&self) -> bool {
        let has_token = self.token.as_deref().map_or(false, |t| !t.is_empty());
        self.is_authenticated == has_token
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(token: &str) -> AuthPayload {
        AuthPayload {
            access_token: token.to_string(),
            id: 1,
            username: "emilys".to_string(),
            email: "emily@example.test".to_string(),
            first_name: "Emily".to_string(),
            last_name: "Johnson".to_string(),
            image: String::new(),
        }
    }

    #[test]
    fn test_default_is_anonymous() {
        let session = Session::default();
        assert_eq!(session.phase(), AuthPhase::Anonymous);
        assert!(session.is_consistent());
    }

    #[test]
    fn test_authenticate_success() {
        let mut session = Session::default();
        session.begin_authentication();
        assert_eq!(session.phase(), AuthPhase::Authenticating);

        session.complete_authentication(&payload("tok123"));
        assert_eq!(session.phase(), AuthPhase::Authenticated);
        assert_eq!(session.token.as_deref(), Some("tok123"));
        assert_eq!(session.profile.as_ref().unwrap().username, "emilys");
        assert!(session.last_error.is_none());
        assert!(!session.pending);
    }

    #[test]
    fn test_empty_token_is_a_failure() {
        let mut session = Session::default();
        session.begin_authentication();
        session.complete_authentication(&payload(""));
        assert_eq!(session.phase(), AuthPhase::AuthFailed);
        assert_eq!(session.last_error.as_deref(), Some(LOGIN_FAILED_MESSAGE));
        assert!(session.is_consistent());
    }

    #[test]
    fn test_failure_then_retry_then_clear_error() {
        let mut session = Session::default();
        session.begin_authentication();
        session.fail_authentication("Invalid credentials");
        assert_eq!(session.phase(), AuthPhase::AuthFailed);
        assert!(session.token.is_none());

        session.begin_authentication();
        assert!(session.last_error.is_none());
        session.fail_authentication("Invalid credentials");

        session.clear_error();
        assert_eq!(session.phase(), AuthPhase::Anonymous);
        assert!(!session.is_authenticated);
    }

    #[test]
    fn test_restore() {
        let mut session = Session::default();
        session.restore(Some("stored".to_string()));
        assert_eq!(session.phase(), AuthPhase::Authenticated);
        assert!(session.profile.is_none());

        let mut session = Session::default();
        session.restore(Some(String::new()));
        assert_eq!(session.phase(), AuthPhase::Anonymous);
        assert!(session.token.is_none());

        let mut session = Session::default();
        session.restore(None);
        assert_eq!(session, Session::default());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = Session::default();
        session.begin_authentication();
        session.complete_authentication(&payload("tok123"));
        session.reset();
        assert_eq!(session, Session::default());
    }

    #[test]
    fn test_json_uses_camel_case() {
        let mut session = Session::default();
        session.restore(Some("tok".to_string()));
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["isAuthenticated"], true);
        assert!(value["lastError"].is_null());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Begin,
            Complete(String),
            Fail(String),
            Restore(Option<String>),
            Reset,
            ClearError,
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                Just(Op::Begin),
                "[a-z]{0,4}".prop_map(Op::Complete),
                "[a-z ]{1,8}".prop_map(Op::Fail),
                proptest::option::of("[a-z]{0,4}").prop_map(Op::Restore),
                Just(Op::Reset),
                Just(Op::ClearError),
            ]
        }

        proptest! {
            #[test]
            fn authenticated_iff_token_present(ops in proptest::collection::vec(op(), 0..40)) {
                let mut session = Session::default();
                for op in ops {
                    match op {
                        Op::Begin => session.begin_authentication(),
                        Op::Complete(token) => session.complete_authentication(&payload(&token)),
                        Op::Fail(message) => session.fail_authentication(message),
                        Op::Restore(token) => session.restore(token),
                        Op::Reset => session.reset(),
                        Op::ClearError => session.clear_error(),
                    }
                    prop_assert!(session.is_consistent(), "inconsistent: {:?}", session);
                }
            }
        }
    }
}
