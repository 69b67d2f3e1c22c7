use chrono::{DateTime, Utc};
use derive_more::{AsRef, Deref, Display};
use uuid::Uuid;

use crate::{CreateError, DeleteError, ProfileID, ReadError, Role};

#[allow(async_fn_in_trait)]
pub trait InvitationService {
    async fn get_invitations(&self) -> Result<Vec<Invitation>, ReadError>;
    async fn create_invitation(&self, email: &str, role: Role) -> Result<Invitation, CreateError>;
    async fn delete_invitation(&self, id: InvitationID) -> Result<InvitationID, DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait InvitationRepository {
    async fn read_invitations(&self) -> Result<Vec<Invitation>, ReadError>;
    async fn create_invitation(&self, email: &str, role: Role) -> Result<Invitation, CreateError>;
    async fn delete_invitation(&self, id: InvitationID) -> Result<InvitationID, DeleteError>;
}

/// Signup is invitation-only. Token, creator and expiry are generated by
/// the store when the row is inserted; redeeming a token is part of the
/// signup flow (`SessionRepository::sign_up`), not of this repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invitation {
    pub id: InvitationID,
    pub email: String,
    pub role: Role,
    pub token: InvitationToken,
    pub used: bool,
    pub created_by: ProfileID,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct InvitationID(Uuid);

impl InvitationID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for InvitationID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for InvitationID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq)]
pub struct InvitationToken(String);

impl InvitationToken {
    #[must_use]
    pub fn new(token: String) -> Self {
        Self(token)
    }
}
