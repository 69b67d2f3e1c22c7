//! Serde mirrors of the stored rows. Domain types carry no serde derives;
//! everything crossing the wire is converted here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use uuid::Uuid;

use motus_domain as domain;

pub fn decode<T: DeserializeOwned>(values: Vec<Value>) -> Result<Vec<T>, domain::StorageError> {
    values
        .into_iter()
        .map(|value| {
            serde_json::from_value(value).map_err(|err| domain::StorageError::Other(err.into()))
        })
        .collect()
}

pub fn decode_one<T: DeserializeOwned>(values: Vec<Value>) -> Result<T, domain::StorageError> {
    decode(values)?
        .into_iter()
        .next()
        .ok_or_else(|| domain::StorageError::Rejected("empty insert response".to_string()))
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExerciseRow {
    pub id: Uuid,
    pub name: String,
    pub movement_pattern_id: Option<Uuid>,
    pub direction_id: Option<Uuid>,
    pub chain_type: Option<ChainType>,
    pub execution_tips: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ExerciseRow> for domain::Exercise {
    type Error = domain::NameError;

    fn try_from(row: ExerciseRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            name: domain::Name::new(&row.name)?,
            movement_pattern_id: row.movement_pattern_id.map(Into::into),
            direction_id: row.direction_id.map(Into::into),
            chain_type: row.chain_type.map(Into::into),
            execution_tips: row.execution_tips,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChainType {
    Open,
    Closed,
}

impl From<domain::ChainType> for ChainType {
    fn from(value: domain::ChainType) -> Self {
        match value {
            domain::ChainType::Open => ChainType::Open,
            domain::ChainType::Closed => ChainType::Closed,
        }
    }
}

impl From<ChainType> for domain::ChainType {
    fn from(value: ChainType) -> Self {
        match value {
            ChainType::Open => domain::ChainType::Open,
            ChainType::Closed => domain::ChainType::Closed,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MuscleRow {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<MuscleRow> for domain::Muscle {
    type Error = domain::NameError;

    fn try_from(row: MuscleRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            name: domain::Name::new(&row.name)?,
            created_at: row.created_at,
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MovementPatternRow {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<MovementPatternRow> for domain::MovementPattern {
    type Error = domain::NameError;

    fn try_from(row: MovementPatternRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            name: domain::Name::new(&row.name)?,
            created_at: row.created_at,
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DirectionRow {
    pub id: Uuid,
    pub name: String,
}

impl TryFrom<DirectionRow> for domain::Direction {
    type Error = domain::NameError;

    fn try_from(row: DirectionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            name: domain::Name::new(&row.name)?,
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VideoRow {
    pub id: Uuid,
    pub exercise_id: Uuid,
    pub url: String,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<VideoRow> for domain::ExerciseVideo {
    fn from(row: VideoRow) -> Self {
        Self {
            id: row.id.into(),
            exercise_id: row.exercise_id.into(),
            url: row.url,
            title: row.title,
            created_at: row.created_at,
        }
    }
}

/// Join row of the two muscle association tables.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MuscleLinkRow {
    pub exercise_id: Uuid,
    pub muscle_id: Uuid,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct InvitationRow {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub token: String,
    pub used: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl TryFrom<InvitationRow> for domain::Invitation {
    type Error = domain::RoleError;

    fn try_from(row: InvitationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            email: row.email,
            role: domain::Role::try_from(row.role.as_str())?,
            token: domain::InvitationToken::new(row.token),
            used: row.used,
            created_by: row.created_by.into(),
            created_at: row.created_at,
            expires_at: row.expires_at,
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ProfileRow {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for domain::Profile {
    type Error = domain::RoleError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            email: row.email,
            role: domain::Role::try_from(row.role.as_str())?,
            created_at: row.created_at,
        })
    }
}
