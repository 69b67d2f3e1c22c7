use derive_more::Deref;
use uuid::Uuid;

use crate::{Name, ReadError};

#[allow(async_fn_in_trait)]
pub trait DirectionService {
    async fn get_directions(&self) -> Result<Vec<Direction>, ReadError>;
}

// Directions are fixed master data, maintained outside this application.
#[allow(async_fn_in_trait)]
pub trait DirectionRepository {
    async fn read_directions(&self) -> Result<Vec<Direction>, ReadError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Direction {
    pub id: DirectionID,
    pub name: Name,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct DirectionID(Uuid);

impl DirectionID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for DirectionID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for DirectionID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}
