//! Repository implementation against the remote table client.
//!
//! Writes to the exercise aggregate are multi-step: the scalar row first,
//! then the three association sets. The steps are individual requests with
//! no surrounding transaction; when a later step fails, the earlier steps
//! stay committed and the error is reported to the caller, whose full-form
//! retry converges on the intended end state.

use std::collections::BTreeMap;

use futures_util::future;
use serde_json::{Value, json};

use motus_domain::{
    CreateError, DeleteError, Direction, DirectionID, DirectionRepository, Exercise, ExerciseDraft,
    ExerciseID, ExerciseRepository, ExerciseVideo, ExerciseWithRelations, Invitation, InvitationID,
    InvitationRepository, MovementPattern, MovementPatternID, MovementPatternRepository, Muscle,
    MuscleID, MuscleRepository, MuscleRole, Name, ReadError, Role, UpdateError,
};

use crate::association::AssociationStore;
use crate::client::{Client, Filter, OrderBy, Table};
use crate::rows;

#[derive(Clone)]
pub struct RemoteStore<C> {
    client: C,
}

impl<C: Client> RemoteStore<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn associations(&self) -> AssociationStore<'_, C> {
        AssociationStore::new(&self.client)
    }

    async fn exercise_rows(&self) -> Result<Vec<Exercise>, ReadError> {
        let values = self
            .client
            .select(Table::Exercises, None, Some(OrderBy::asc("name")))
            .await?;
        rows::decode::<rows::ExerciseRow>(values)?
            .into_iter()
            .map(|row| Exercise::try_from(row).map_err(|err| ReadError::Other(err.into())))
            .collect()
    }

    /// Resolves one exercise into its hydrated form. The three association
    /// lookups run concurrently; a failure of any one of them fails this
    /// exercise's hydration.
    async fn hydrate(
        &self,
        exercise: Exercise,
        movement_patterns: &BTreeMap<MovementPatternID, MovementPattern>,
        directions: &BTreeMap<DirectionID, Direction>,
        muscles: &BTreeMap<MuscleID, Muscle>,
    ) -> Result<ExerciseWithRelations, ReadError> {
        let (primary_muscles, synergist_muscles, videos) = future::try_join3(
            self.linked_muscles(Table::ExercisePrimaryMuscles, exercise.id, muscles),
            self.linked_muscles(Table::ExerciseSynergistMuscles, exercise.id, muscles),
            self.exercise_videos(exercise.id),
        )
        .await?;

        Ok(ExerciseWithRelations {
            movement_pattern: exercise
                .movement_pattern_id
                .and_then(|id| movement_patterns.get(&id).cloned()),
            direction: exercise.direction_id.and_then(|id| directions.get(&id).cloned()),
            exercise,
            primary_muscles,
            synergist_muscles,
            videos,
        })
    }

    // Join rows whose muscle no longer exists are dropped silently.
    async fn linked_muscles(
        &self,
        table: Table,
        id: ExerciseID,
        muscles: &BTreeMap<MuscleID, Muscle>,
    ) -> Result<Vec<Muscle>, ReadError> {
        let values = self
            .client
            .select(table, Some(owner_filter(id)), None)
            .await?;
        Ok(rows::decode::<rows::MuscleLinkRow>(values)?
            .into_iter()
            .filter_map(|link| muscles.get(&MuscleID::from(link.muscle_id)).cloned())
            .collect())
    }

    async fn exercise_videos(&self, id: ExerciseID) -> Result<Vec<ExerciseVideo>, ReadError> {
        let values = self
            .client
            .select(Table::ExerciseVideos, Some(owner_filter(id)), None)
            .await?;
        Ok(rows::decode::<rows::VideoRow>(values)?
            .into_iter()
            .map(Into::into)
            .collect())
    }
}

impl<C: Client> ExerciseRepository for RemoteStore<C> {
    /// Scalar rows are fetched name-ascending together with the three
    /// lookup tables, then every exercise is hydrated concurrently. The
    /// result keeps the order of the scalar fetch regardless of the order
    /// in which the per-exercise lookups complete.
    async fn read_exercises(&self) -> Result<Vec<ExerciseWithRelations>, ReadError> {
        let (exercises, movement_patterns, directions, muscles) = future::try_join4(
            self.exercise_rows(),
            self.read_movement_patterns(),
            self.read_directions(),
            self.read_muscles(),
        )
        .await?;

        let movement_patterns = movement_patterns
            .into_iter()
            .map(|pattern| (pattern.id, pattern))
            .collect::<BTreeMap<_, _>>();
        let directions = directions
            .into_iter()
            .map(|direction| (direction.id, direction))
            .collect::<BTreeMap<_, _>>();
        let muscles = muscles
            .into_iter()
            .map(|muscle| (muscle.id, muscle))
            .collect::<BTreeMap<_, _>>();

        future::try_join_all(exercises.into_iter().map(|exercise| {
            self.hydrate(exercise, &movement_patterns, &directions, &muscles)
        }))
        .await
    }

    async fn create_exercise(&self, draft: ExerciseDraft) -> Result<Exercise, CreateError> {
        let inserted = self
            .client
            .insert(Table::Exercises, vec![scalar_row(&draft)])
            .await?;
        let exercise = Exercise::try_from(rows::decode_one::<rows::ExerciseRow>(inserted)?)
            .map_err(|err| CreateError::Other(err.into()))?;

        // From here on the scalar row is committed; an association failure
        // leaves it in place and surfaces to the caller.
        let associations = self.associations();
        associations
            .add_muscles(exercise.id, MuscleRole::Primary, &draft.primary_muscle_ids)
            .await?;
        associations
            .add_muscles(exercise.id, MuscleRole::Synergist, &draft.synergist_muscle_ids)
            .await?;
        associations.add_videos(exercise.id, &draft.videos).await?;

        Ok(exercise)
    }

    /// Full replace: the scalar row is updated, then each association set
    /// is cleared and re-inserted from the draft, whether it changed or not.
    async fn replace_exercise(
        &self,
        id: ExerciseID,
        draft: ExerciseDraft,
    ) -> Result<(), UpdateError> {
        self.client
            .update(
                Table::Exercises,
                scalar_row(&draft),
                Filter::eq("id", id.to_string()),
            )
            .await?;

        let associations = self.associations();
        associations
            .replace_muscles(id, MuscleRole::Primary, &draft.primary_muscle_ids)
            .await?;
        associations
            .replace_muscles(id, MuscleRole::Synergist, &draft.synergist_muscle_ids)
            .await?;
        associations.replace_videos(id, &draft.videos).await?;

        Ok(())
    }

    // Only the scalar row is deleted here; association rows are cascaded
    // by the store schema.
    async fn delete_exercise(&self, id: ExerciseID) -> Result<ExerciseID, DeleteError> {
        self.client
            .delete(Table::Exercises, Filter::eq("id", id.to_string()))
            .await?;
        Ok(id)
    }
}

impl<C: Client> MuscleRepository for RemoteStore<C> {
    async fn read_muscles(&self) -> Result<Vec<Muscle>, ReadError> {
        let values = self
            .client
            .select(Table::Muscles, None, Some(OrderBy::asc("name")))
            .await?;
        rows::decode::<rows::MuscleRow>(values)?
            .into_iter()
            .map(|row| Muscle::try_from(row).map_err(|err| ReadError::Other(err.into())))
            .collect()
    }

    async fn create_muscle(&self, name: Name) -> Result<Muscle, CreateError> {
        let inserted = self
            .client
            .insert(Table::Muscles, vec![json!({ "name": name.as_ref() })])
            .await?;
        Muscle::try_from(rows::decode_one::<rows::MuscleRow>(inserted)?)
            .map_err(|err| CreateError::Other(err.into()))
    }

    async fn rename_muscle(&self, id: MuscleID, name: Name) -> Result<(), UpdateError> {
        Ok(self
            .client
            .update(
                Table::Muscles,
                json!({ "name": name.as_ref() }),
                Filter::eq("id", id.to_string()),
            )
            .await?)
    }

    async fn delete_muscle(&self, id: MuscleID) -> Result<MuscleID, DeleteError> {
        self.client
            .delete(Table::Muscles, Filter::eq("id", id.to_string()))
            .await?;
        Ok(id)
    }
}

impl<C: Client> MovementPatternRepository for RemoteStore<C> {
    async fn read_movement_patterns(&self) -> Result<Vec<MovementPattern>, ReadError> {
        let values = self
            .client
            .select(Table::MovementPatterns, None, Some(OrderBy::asc("name")))
            .await?;
        rows::decode::<rows::MovementPatternRow>(values)?
            .into_iter()
            .map(|row| MovementPattern::try_from(row).map_err(|err| ReadError::Other(err.into())))
            .collect()
    }

    async fn create_movement_pattern(&self, name: Name) -> Result<MovementPattern, CreateError> {
        let inserted = self
            .client
            .insert(Table::MovementPatterns, vec![json!({ "name": name.as_ref() })])
            .await?;
        MovementPattern::try_from(rows::decode_one::<rows::MovementPatternRow>(inserted)?)
            .map_err(|err| CreateError::Other(err.into()))
    }

    async fn rename_movement_pattern(
        &self,
        id: MovementPatternID,
        name: Name,
    ) -> Result<(), UpdateError> {
        Ok(self
            .client
            .update(
                Table::MovementPatterns,
                json!({ "name": name.as_ref() }),
                Filter::eq("id", id.to_string()),
            )
            .await?)
    }

    async fn delete_movement_pattern(
        &self,
        id: MovementPatternID,
    ) -> Result<MovementPatternID, DeleteError> {
        self.client
            .delete(Table::MovementPatterns, Filter::eq("id", id.to_string()))
            .await?;
        Ok(id)
    }
}

impl<C: Client> DirectionRepository for RemoteStore<C> {
    async fn read_directions(&self) -> Result<Vec<Direction>, ReadError> {
        let values = self
            .client
            .select(Table::Directions, None, Some(OrderBy::asc("name")))
            .await?;
        rows::decode::<rows::DirectionRow>(values)?
            .into_iter()
            .map(|row| Direction::try_from(row).map_err(|err| ReadError::Other(err.into())))
            .collect()
    }
}

impl<C: Client> InvitationRepository for RemoteStore<C> {
    async fn read_invitations(&self) -> Result<Vec<Invitation>, ReadError> {
        let values = self
            .client
            .select(Table::Invitations, None, Some(OrderBy::desc("created_at")))
            .await?;
        rows::decode::<rows::InvitationRow>(values)?
            .into_iter()
            .map(|row| Invitation::try_from(row).map_err(|err| ReadError::Other(err.into())))
            .collect()
    }

    async fn create_invitation(&self, email: &str, role: Role) -> Result<Invitation, CreateError> {
        let inserted = self
            .client
            .insert(
                Table::Invitations,
                vec![json!({
                    "email": email.to_lowercase(),
                    "role": role.as_str(),
                })],
            )
            .await?;
        Invitation::try_from(rows::decode_one::<rows::InvitationRow>(inserted)?)
            .map_err(|err| CreateError::Other(err.into()))
    }

    async fn delete_invitation(&self, id: InvitationID) -> Result<InvitationID, DeleteError> {
        self.client
            .delete(Table::Invitations, Filter::eq("id", id.to_string()))
            .await?;
        Ok(id)
    }
}

fn owner_filter(id: ExerciseID) -> Filter {
    Filter::eq("exercise_id", id.to_string())
}

fn scalar_row(draft: &ExerciseDraft) -> Value {
    json!({
        "name": draft.name.as_ref(),
        "movement_pattern_id": draft.movement_pattern_id.map(|id| *id),
        "direction_id": draft.direction_id.map(|id| *id),
        "chain_type": draft.chain_type.map(rows::ChainType::from),
        "execution_tips": draft.execution_tips,
    })
}
