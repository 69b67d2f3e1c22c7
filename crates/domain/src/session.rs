use std::cell::RefCell;

use log::error;

use crate::{CreateError, DeleteError, InvitationToken, Profile, ReadError};

#[allow(async_fn_in_trait)]
pub trait SessionService {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Profile, ReadError>;
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        token: Option<&InvitationToken>,
    ) -> Result<Profile, CreateError>;
    async fn sign_out(&self) -> Result<(), DeleteError>;
    async fn get_session(&self) -> Result<Option<Profile>, ReadError>;
    async fn change_password(&self, new_password: &str) -> PasswordChangeOutcome;
}

/// Auth collaborator. Sessions are managed entirely by the backend; this
/// interface is only what the catalog core needs from it.
#[allow(async_fn_in_trait)]
pub trait SessionRepository {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Profile, ReadError>;
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        token: Option<&InvitationToken>,
    ) -> Result<Profile, CreateError>;
    async fn sign_out(&self) -> Result<(), DeleteError>;
    async fn current_session(&self) -> Result<Option<Profile>, ReadError>;
    async fn change_password(&self, new_password: &str) -> PasswordChangeOutcome;
}

/// Outcome of a password change. The backend call is raced against a fixed
/// timeout; on timeout the request may or may not have been applied, which
/// neither `Success` nor `Failure` can express. The caller decides what
/// `Indeterminate` means for its flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordChangeOutcome {
    Success,
    Failure(String),
    Indeterminate,
}

impl PasswordChangeOutcome {
    /// The policy of the password-change dialog: an unconfirmed change is
    /// presented as a success and the user signs in again if it was not.
    pub fn assume_success(self) -> Result<(), String> {
        match self {
            PasswordChangeOutcome::Success | PasswordChangeOutcome::Indeterminate => Ok(()),
            PasswordChangeOutcome::Failure(reason) => Err(reason),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Initializing,
    Authenticated(Profile),
    Anonymous,
    Disposed,
}

/// Holder of the current session, passed explicitly to whatever needs the
/// signed-in profile instead of being looked up through a global. Starts
/// in `Initializing` until the first session check resolves it to
/// `Authenticated` or `Anonymous`; `Disposed` is terminal.
#[derive(Debug, Default)]
pub struct SessionContext {
    state: RefCell<SessionState>,
}

impl SessionContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn authenticate(&self, profile: Profile) {
        self.transition(SessionState::Authenticated(profile));
    }

    pub fn clear(&self) {
        self.transition(SessionState::Anonymous);
    }

    pub fn dispose(&self) {
        *self.state.borrow_mut() = SessionState::Disposed;
    }

    #[must_use]
    pub fn profile(&self) -> Option<Profile> {
        match &*self.state.borrow() {
            SessionState::Authenticated(profile) => Some(profile.clone()),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.profile().is_some_and(|profile| profile.role.can_edit())
    }

    #[must_use]
    pub fn is_initializing(&self) -> bool {
        *self.state.borrow() == SessionState::Initializing
    }

    fn transition(&self, state: SessionState) {
        let mut current = self.state.borrow_mut();
        if *current == SessionState::Disposed {
            error!("session context used after dispose");
            return;
        }
        *current = state;
    }
}
