use chrono::{DateTime, Utc};
use derive_more::Deref;
use uuid::Uuid;

use crate::{CreateError, DeleteError, Name, ReadError, UpdateError};

#[allow(async_fn_in_trait)]
pub trait MuscleService {
    async fn get_muscles(&self) -> Result<Vec<Muscle>, ReadError>;
    async fn create_muscle(&self, name: Name) -> Result<Muscle, CreateError>;
    async fn rename_muscle(&self, id: MuscleID, name: Name) -> Result<(), UpdateError>;
    async fn delete_muscle(&self, id: MuscleID) -> Result<MuscleID, DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait MuscleRepository {
    async fn read_muscles(&self) -> Result<Vec<Muscle>, ReadError>;
    async fn create_muscle(&self, name: Name) -> Result<Muscle, CreateError>;
    async fn rename_muscle(&self, id: MuscleID, name: Name) -> Result<(), UpdateError>;
    async fn delete_muscle(&self, id: MuscleID) -> Result<MuscleID, DeleteError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Muscle {
    pub id: MuscleID,
    pub name: Name,
    pub created_at: DateTime<Utc>,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct MuscleID(Uuid);

impl MuscleID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for MuscleID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for MuscleID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// Role of a muscle within one exercise. The two roles are independent
/// association sets; a muscle may hold both roles for the same exercise.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum MuscleRole {
    Primary,
    Synergist,
}
