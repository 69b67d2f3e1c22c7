use chrono::{DateTime, Utc};
use derive_more::Deref;
use uuid::Uuid;

use crate::{CreateError, DeleteError, Name, ReadError, UpdateError};

#[allow(async_fn_in_trait)]
pub trait MovementPatternService {
    async fn get_movement_patterns(&self) -> Result<Vec<MovementPattern>, ReadError>;
    async fn create_movement_pattern(&self, name: Name) -> Result<MovementPattern, CreateError>;
    async fn rename_movement_pattern(
        &self,
        id: MovementPatternID,
        name: Name,
    ) -> Result<(), UpdateError>;
    async fn delete_movement_pattern(
        &self,
        id: MovementPatternID,
    ) -> Result<MovementPatternID, DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait MovementPatternRepository {
    async fn read_movement_patterns(&self) -> Result<Vec<MovementPattern>, ReadError>;
    async fn create_movement_pattern(&self, name: Name) -> Result<MovementPattern, CreateError>;
    async fn rename_movement_pattern(
        &self,
        id: MovementPatternID,
        name: Name,
    ) -> Result<(), UpdateError>;
    async fn delete_movement_pattern(
        &self,
        id: MovementPatternID,
    ) -> Result<MovementPatternID, DeleteError>;
}

/// Master-data row. Exercises reference movement patterns by nullable id;
/// deleting a pattern leaves those references dangling and the read path
/// resolves them to `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementPattern {
    pub id: MovementPatternID,
    pub name: Name,
    pub created_at: DateTime<Utc>,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct MovementPatternID(Uuid);

impl MovementPatternID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for MovementPatternID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for MovementPatternID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}
