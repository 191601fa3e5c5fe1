//! Login state machine.
//!
//! ```text
//!   Unauthenticated ─add_user─▶ Authenticated
//!   Unauthenticated ─add_user─▶ PendingMfa ─submit_mfa─▶ Authenticated
//!                               PendingMfa ─submit_mfa─▶ PendingMfa (another round)
//!   any login failure          ─────────────────────────▶ Rejected
//! ```
//!
//! RULES:
//!   - `add_user` only from Unauthenticated, `submit_mfa` only from PendingMfa.
//!     A call in the wrong state fails locally and never reaches the remote.
//!   - Any remote or decoding failure during login lands in Rejected,
//!     keeping the access token if the remote already issued one.
//!   - `remove_user` returns to Unauthenticated from every state.

use crate::{
    client::PlaidClient,
    error::{PlaidError, PlaidResult},
    mapper::{AddUserResponse, AuthOutcome},
    mfa::{MfaChallenge, MfaResponse},
    request::Credentials,
    types::AccessToken,
};

#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Unauthenticated,
    PendingMfa {
        access_token: AccessToken,
        challenge:    MfaChallenge,
    },
    Authenticated {
        access_token: AccessToken,
    },
    Rejected {
        reason:       String,
        /// Kept when the failure came after a token was issued, so the
        /// half-created user can still be removed.
        access_token: Option<AccessToken>,
    },
}

impl AuthState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unauthenticated      => "unauthenticated",
            Self::PendingMfa { .. }    => "pending_mfa",
            Self::Authenticated { .. } => "authenticated",
            Self::Rejected { .. }      => "rejected",
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        match self {
            Self::Unauthenticated => None,
            Self::PendingMfa { access_token, .. } | Self::Authenticated { access_token } => {
                Some(access_token)
            }
            Self::Rejected { access_token, .. } => access_token.as_deref(),
        }
    }

    fn after(access_token: AccessToken, outcome: &AuthOutcome) -> Self {
        match outcome {
            AuthOutcome::MfaRequired { challenge } => Self::PendingMfa {
                access_token,
                challenge: challenge.clone(),
            },
            AuthOutcome::Connected { .. } => Self::Authenticated { access_token },
        }
    }
}

/// One user's login against one institution.
#[derive(Debug)]
pub struct LinkSession {
    client: PlaidClient,
    state:  AuthState,
}

impl LinkSession {
    pub fn new(client: PlaidClient) -> Self {
        Self {
            client,
            state: AuthState::Unauthenticated,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn client(&self) -> &PlaidClient {
        &self.client
    }

    pub async fn add_user(
        &mut self,
        credentials: &Credentials,
        institution_type: &str,
    ) -> PlaidResult<AddUserResponse> {
        if self.state != AuthState::Unauthenticated {
            return Err(PlaidError::InvalidAuthState {
                expected: "unauthenticated",
                actual: self.state.name(),
            });
        }

        let (issued, result) = self
            .client
            .add_user_keeping_token(credentials, institution_type)
            .await;
        match result {
            Ok(response) => {
                self.state = AuthState::after(response.access_token.clone(), &response.outcome);
                log::info!("add_user: now {}", self.state.name());
                Ok(response)
            }
            Err(e) => {
                self.reject(&e, issued);
                Err(e)
            }
        }
    }

    pub async fn submit_mfa(&mut self, response: &MfaResponse) -> PlaidResult<AuthOutcome> {
        let access_token = match &self.state {
            AuthState::PendingMfa { access_token, .. } => access_token.clone(),
            other => {
                return Err(PlaidError::InvalidAuthState {
                    expected: "pending_mfa",
                    actual: other.name(),
                })
            }
        };

        match self.client.submit_mfa(&access_token, response).await {
            Ok(outcome) => {
                self.state = AuthState::after(access_token, &outcome);
                log::info!("submit_mfa: now {}", self.state.name());
                Ok(outcome)
            }
            Err(e) => {
                self.reject(&e, Some(access_token));
                Err(e)
            }
        }
    }

    /// Remove the user remotely (when a token is known) and forget it locally.
    /// The local state resets even if the remote call fails.
    pub async fn remove_user(&mut self) -> PlaidResult<Option<String>> {
        let access_token = self.state.access_token().map(str::to_string);
        self.state = AuthState::Unauthenticated;
        match access_token {
            Some(token) => self.client.remove_user(&token).await,
            None => Ok(None),
        }
    }

    /// Forget the current login without contacting the remote.
    pub fn reset(&mut self) {
        self.state = AuthState::Unauthenticated;
    }

    fn reject(&mut self, error: &PlaidError, access_token: Option<AccessToken>) {
        log::warn!("login rejected: {error}");
        self.state = AuthState::Rejected {
            reason: error.to_string(),
            access_token,
        };
    }
}
