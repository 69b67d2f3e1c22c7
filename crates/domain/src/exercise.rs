use std::{collections::HashSet, slice::Iter};

use chrono::{DateTime, Utc};
use derive_more::Deref;
use uuid::Uuid;

use crate::{
    CreateError, DeleteError, Direction, DirectionID, MovementPattern, MovementPatternID, Muscle,
    MuscleID, Name, ReadError, UpdateError,
};

#[allow(async_fn_in_trait)]
pub trait ExerciseService {
    async fn get_exercises(&self) -> Result<Vec<ExerciseWithRelations>, ReadError>;
    async fn create_exercise(&self, draft: ExerciseDraft) -> Result<Exercise, CreateError>;
    async fn replace_exercise(&self, id: ExerciseID, draft: ExerciseDraft)
    -> Result<(), UpdateError>;
    async fn delete_exercise(&self, id: ExerciseID) -> Result<ExerciseID, DeleteError>;
}

/// The exercise aggregate: reads return hydrated records, writes take the
/// full draft and replace the dependent association sets wholesale.
#[allow(async_fn_in_trait)]
pub trait ExerciseRepository {
    async fn read_exercises(&self) -> Result<Vec<ExerciseWithRelations>, ReadError>;
    async fn create_exercise(&self, draft: ExerciseDraft) -> Result<Exercise, CreateError>;
    async fn replace_exercise(&self, id: ExerciseID, draft: ExerciseDraft)
    -> Result<(), UpdateError>;
    async fn delete_exercise(&self, id: ExerciseID) -> Result<ExerciseID, DeleteError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: Name,
    pub movement_pattern_id: Option<MovementPatternID>,
    pub direction_id: Option<DirectionID>,
    pub chain_type: Option<ChainType>,
    pub execution_tips: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseID(Uuid);

impl ExerciseID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for ExerciseID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for ExerciseID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum ChainType {
    Open,
    Closed,
}

impl ChainType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ChainType::Open => "open",
            ChainType::Closed => "closed",
        }
    }
}

impl Property for ChainType {
    fn iter() -> Iter<'static, ChainType> {
        static CHAIN_TYPES: [ChainType; 2] = [ChainType::Open, ChainType::Closed];
        CHAIN_TYPES.iter()
    }

    fn name(self) -> &'static str {
        match self {
            ChainType::Open => "Open Chain",
            ChainType::Closed => "Closed Chain",
        }
    }
}

impl TryFrom<&str> for ChainType {
    type Error = ChainTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "open" => Ok(ChainType::Open),
            "closed" => Ok(ChainType::Closed),
            _ => Err(ChainTypeError::Invalid(value.to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ChainTypeError {
    #[error("invalid chain type: {0}")]
    Invalid(String),
}

/// Reference video owned by exactly one exercise. Created, replaced and
/// deleted only as part of an exercise write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseVideo {
    pub id: VideoID,
    pub exercise_id: ExerciseID,
    pub url: String,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct VideoID(Uuid);

impl VideoID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for VideoID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for VideoID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// Hydrated read model: an exercise with its foreign keys and association
/// sets resolved into embedded values. Derived on every read, never stored.
///
/// Muscle and video order reflects whatever row order the store returned;
/// it is not stable across a write/read round trip.
#[derive(Deref, Debug, Clone, PartialEq, Eq)]
pub struct ExerciseWithRelations {
    #[deref]
    pub exercise: Exercise,
    pub movement_pattern: Option<MovementPattern>,
    pub direction: Option<Direction>,
    pub primary_muscles: Vec<Muscle>,
    pub synergist_muscles: Vec<Muscle>,
    pub videos: Vec<ExerciseVideo>,
}

impl ExerciseWithRelations {
    #[must_use]
    pub fn involves(&self, id: MuscleID) -> bool {
        self.primary_muscles
            .iter()
            .chain(&self.synergist_muscles)
            .any(|muscle| muscle.id == id)
    }
}

/// Submitted form state for a create or replace. The form layer is
/// responsible for required-field checks; the id lists and video drafts
/// are taken as-is and become the new association sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseDraft {
    pub name: Name,
    pub movement_pattern_id: Option<MovementPatternID>,
    pub direction_id: Option<DirectionID>,
    pub chain_type: Option<ChainType>,
    pub execution_tips: Option<String>,
    pub primary_muscle_ids: Vec<MuscleID>,
    pub synergist_muscle_ids: Vec<MuscleID>,
    pub videos: Vec<VideoDraft>,
}

/// Videos whose URL trims to empty are dropped before persistence; an
/// empty title is stored as null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDraft {
    pub url: String,
    pub title: String,
}

#[derive(Default, PartialEq)]
pub struct ExerciseFilter {
    pub name: String,
    pub muscles: HashSet<MuscleID>,
    pub movement_patterns: HashSet<MovementPatternID>,
    pub chain_types: HashSet<ChainType>,
}

impl ExerciseFilter {
    #[must_use]
    pub fn exercises<'a>(
        &self,
        exercises: impl Iterator<Item = &'a ExerciseWithRelations>,
    ) -> Vec<&'a ExerciseWithRelations> {
        exercises
            .filter(|e| {
                e.name
                    .as_ref()
                    .to_lowercase()
                    .contains(self.name.to_lowercase().trim())
                    && (self.muscles.is_empty()
                        || self.muscles.iter().all(|m| {
                            if m.is_nil() {
                                e.primary_muscles.is_empty() && e.synergist_muscles.is_empty()
                            } else {
                                e.involves(*m)
                            }
                        }))
                    && (self.movement_patterns.is_empty()
                        || e.movement_pattern_id
                            .is_some_and(|id| self.movement_patterns.contains(&id)))
                    && (self.chain_types.is_empty()
                        || e.chain_type.is_some_and(|c| self.chain_types.contains(&c)))
            })
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty()
            && self.muscles.is_empty()
            && self.movement_patterns.is_empty()
            && self.chain_types.is_empty()
    }

    #[must_use]
    pub fn chain_type_list(&self) -> Vec<(ChainType, bool)> {
        ChainType::iter_filter()
            .map(|c| (*c, self.chain_types.contains(c)))
            .collect::<Vec<_>>()
    }

    pub fn toggle_muscle(&mut self, muscle: MuscleID) {
        if self.muscles.contains(&muscle) {
            self.muscles.remove(&muscle);
        } else {
            if muscle.is_nil() {
                self.muscles.clear();
            } else {
                self.muscles.remove(&MuscleID::nil());
            }
            self.muscles.insert(muscle);
        }
    }

    pub fn toggle_movement_pattern(&mut self, pattern: MovementPatternID) {
        if self.movement_patterns.contains(&pattern) {
            self.movement_patterns.remove(&pattern);
        } else {
            self.movement_patterns.insert(pattern);
        }
    }

    pub fn toggle_chain_type(&mut self, chain_type: ChainType) {
        if self.chain_types.contains(&chain_type) {
            self.chain_types.remove(&chain_type);
        } else {
            self.chain_types.insert(chain_type);
        }
    }
}

pub trait Property: Clone + Copy + Sized {
    fn iter() -> Iter<'static, Self>;
    fn iter_filter() -> Iter<'static, Self> {
        Self::iter()
    }
    fn name(self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn muscle(id: u128, name: &str) -> Muscle {
        Muscle {
            id: id.into(),
            name: Name::new(name).unwrap(),
            created_at: DateTime::UNIX_EPOCH,
        }
    }

    fn exercise(id: u128, name: &str) -> Exercise {
        Exercise {
            id: id.into(),
            name: Name::new(name).unwrap(),
            movement_pattern_id: None,
            direction_id: None,
            chain_type: None,
            execution_tips: None,
            created_at: DateTime::UNIX_EPOCH,
            updated_at: DateTime::UNIX_EPOCH,
        }
    }

    fn hydrated(id: u128, name: &str) -> ExerciseWithRelations {
        ExerciseWithRelations {
            exercise: exercise(id, name),
            movement_pattern: None,
            direction: None,
            primary_muscles: vec![],
            synergist_muscles: vec![],
            videos: vec![],
        }
    }

    #[test]
    fn test_exercise_with_relations_deref() {
        let record = hydrated(1, "Squat");

        assert_eq!(record.name, Name::new("Squat").unwrap());
        assert!(!record.id.is_nil());
    }

    #[rstest]
    #[case(2.into(), true)]
    #[case(3.into(), true)]
    #[case(4.into(), false)]
    fn test_exercise_with_relations_involves(#[case] id: MuscleID, #[case] expected: bool) {
        let record = ExerciseWithRelations {
            primary_muscles: vec![muscle(2, "Quadriceps")],
            synergist_muscles: vec![muscle(3, "Glutes")],
            ..hydrated(1, "Squat")
        };

        assert_eq!(record.involves(id), expected);
    }

    #[rstest]
    #[case("open", Ok(ChainType::Open))]
    #[case("closed", Ok(ChainType::Closed))]
    #[case("semi", Err(ChainTypeError::Invalid("semi".to_string())))]
    fn test_chain_type_try_from(
        #[case] value: &str,
        #[case] expected: Result<ChainType, ChainTypeError>,
    ) {
        assert_eq!(ChainType::try_from(value), expected);
    }

    #[test]
    fn test_chain_type_round_trip() {
        for chain_type in ChainType::iter() {
            assert_eq!(ChainType::try_from(chain_type.as_str()), Ok(*chain_type));
        }
    }

    #[test]
    fn test_chain_type_name() {
        let mut names = std::collections::HashSet::new();

        for chain_type in ChainType::iter_filter() {
            let name = chain_type.name();

            assert!(!name.is_empty());
            assert!(!names.contains(name));

            names.insert(name);
        }
    }

    #[rstest]
    #[case::name_lower_case(
        ExerciseFilter { name: "squat".into(), ..ExerciseFilter::default() },
        &["Back Squat", "Deadlift"],
        &["Back Squat"]
    )]
    #[case::name_upper_case(
        ExerciseFilter { name: "SQUAT".into(), ..ExerciseFilter::default() },
        &["Back Squat", "Deadlift"],
        &["Back Squat"]
    )]
    #[case::empty_filter(
        ExerciseFilter::default(),
        &["Back Squat", "Deadlift"],
        &["Back Squat", "Deadlift"]
    )]
    fn test_exercise_filter_by_name(
        #[case] filter: ExerciseFilter,
        #[case] names: &[&str],
        #[case] expected: &[&str],
    ) {
        let exercises = names
            .iter()
            .enumerate()
            .map(|(i, name)| hydrated(i as u128 + 1, name))
            .collect::<Vec<_>>();

        assert_eq!(
            filter
                .exercises(exercises.iter())
                .into_iter()
                .map(|e| e.name.as_ref())
                .collect::<Vec<_>>(),
            expected
        );
    }

    #[test]
    fn test_exercise_filter_by_muscle() {
        let with_muscles = ExerciseWithRelations {
            primary_muscles: vec![muscle(2, "Quadriceps")],
            synergist_muscles: vec![muscle(3, "Glutes")],
            ..hydrated(1, "Squat")
        };
        let without_muscles = hydrated(4, "Plank");
        let exercises = [with_muscles, without_muscles];

        let filter = ExerciseFilter {
            muscles: [MuscleID::from(3)].into(),
            ..ExerciseFilter::default()
        };
        assert_eq!(
            filter
                .exercises(exercises.iter())
                .into_iter()
                .map(|e| e.name.as_ref())
                .collect::<Vec<_>>(),
            ["Squat"]
        );

        let filter = ExerciseFilter {
            muscles: [MuscleID::nil()].into(),
            ..ExerciseFilter::default()
        };
        assert_eq!(
            filter
                .exercises(exercises.iter())
                .into_iter()
                .map(|e| e.name.as_ref())
                .collect::<Vec<_>>(),
            ["Plank"]
        );
    }

    #[test]
    fn test_exercise_filter_by_chain_type() {
        let open = ExerciseWithRelations {
            exercise: Exercise {
                chain_type: Some(ChainType::Open),
                ..exercise(1, "Leg Extension")
            },
            ..hydrated(1, "Leg Extension")
        };
        let unset = hydrated(2, "Carry");
        let exercises = [open, unset];

        let filter = ExerciseFilter {
            chain_types: [ChainType::Open].into(),
            ..ExerciseFilter::default()
        };

        assert_eq!(
            filter
                .exercises(exercises.iter())
                .into_iter()
                .map(|e| e.name.as_ref())
                .collect::<Vec<_>>(),
            ["Leg Extension"]
        );
    }

    #[test]
    fn test_exercise_filter_by_movement_pattern() {
        let hinge = ExerciseWithRelations {
            exercise: Exercise {
                movement_pattern_id: Some(7.into()),
                ..exercise(1, "Deadlift")
            },
            ..hydrated(1, "Deadlift")
        };
        let unset = hydrated(2, "Carry");
        let exercises = [hinge, unset];

        let filter = ExerciseFilter {
            movement_patterns: [MovementPatternID::from(7)].into(),
            ..ExerciseFilter::default()
        };

        assert_eq!(
            filter
                .exercises(exercises.iter())
                .into_iter()
                .map(|e| e.name.as_ref())
                .collect::<Vec<_>>(),
            ["Deadlift"]
        );
    }

    #[test]
    fn test_exercise_filter_is_empty() {
        assert!(ExerciseFilter::default().is_empty());
        assert!(
            !ExerciseFilter {
                name: "squat".into(),
                ..ExerciseFilter::default()
            }
            .is_empty()
        );
    }

    #[test]
    fn test_exercise_filter_toggle_muscle() {
        let mut filter = ExerciseFilter::default();

        filter.toggle_muscle(MuscleID::nil());

        assert!(filter.muscles.contains(&MuscleID::nil()));

        filter.toggle_muscle(2.into());

        assert!(filter.muscles.contains(&MuscleID::from(2)));
        assert!(!filter.muscles.contains(&MuscleID::nil()));

        filter.toggle_muscle(2.into());

        assert!(filter.muscles.is_empty());
    }

    #[test]
    fn test_exercise_filter_toggle_chain_type() {
        let mut filter = ExerciseFilter::default();

        filter.toggle_chain_type(ChainType::Open);

        assert_eq!(
            filter.chain_type_list(),
            [(ChainType::Open, true), (ChainType::Closed, false)]
        );

        filter.toggle_chain_type(ChainType::Open);

        assert_eq!(
            filter.chain_type_list(),
            [(ChainType::Open, false), (ChainType::Closed, false)]
        );
    }

    #[test]
    fn test_exercise_filter_toggle_movement_pattern() {
        let mut filter = ExerciseFilter::default();

        filter.toggle_movement_pattern(7.into());

        assert!(filter.movement_patterns.contains(&MovementPatternID::from(7)));

        filter.toggle_movement_pattern(7.into());

        assert!(filter.movement_patterns.is_empty());
    }
}
