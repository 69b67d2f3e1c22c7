//! Association reconciliation
//!
//! An exercise owns three association sets: primary muscles, synergist
//! muscles and reference videos. Writes use full-replace semantics: the
//! whole set for one owner is deleted and re-inserted from the submitted
//! list, never diffed. The delete and the insert are separate requests
//! with no transaction around them; if the insert fails after the delete
//! succeeded, the set stays empty until the caller retries the write.

use std::collections::HashSet;

use serde_json::{Value, json};

use motus_domain::{ExerciseID, MuscleID, MuscleRole, StorageError, VideoDraft};

use crate::client::{Client, Filter, Table};

pub struct AssociationStore<'a, C> {
    client: &'a C,
}

impl<'a, C: Client> AssociationStore<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Insert-only variant for freshly created owners. Skipped entirely
    /// when the list is empty.
    pub async fn add_muscles(
        &self,
        exercise_id: ExerciseID,
        role: MuscleRole,
        muscle_ids: &[MuscleID],
    ) -> Result<(), StorageError> {
        let rows = muscle_rows(exercise_id, muscle_ids);
        if rows.is_empty() {
            return Ok(());
        }
        self.client.insert(role_table(role), rows).await?;
        Ok(())
    }

    /// Replaces the member set for `(exercise_id, role)`. The delete always
    /// runs, the insert only for a non-empty list.
    pub async fn replace_muscles(
        &self,
        exercise_id: ExerciseID,
        role: MuscleRole,
        muscle_ids: &[MuscleID],
    ) -> Result<(), StorageError> {
        self.client
            .delete(role_table(role), owner_filter(exercise_id))
            .await?;
        self.add_muscles(exercise_id, role, muscle_ids).await
    }

    pub async fn add_videos(
        &self,
        exercise_id: ExerciseID,
        videos: &[VideoDraft],
    ) -> Result<(), StorageError> {
        let rows = video_rows(exercise_id, videos);
        if rows.is_empty() {
            return Ok(());
        }
        self.client.insert(Table::ExerciseVideos, rows).await?;
        Ok(())
    }

    pub async fn replace_videos(
        &self,
        exercise_id: ExerciseID,
        videos: &[VideoDraft],
    ) -> Result<(), StorageError> {
        self.client
            .delete(Table::ExerciseVideos, owner_filter(exercise_id))
            .await?;
        self.add_videos(exercise_id, videos).await
    }
}

fn role_table(role: MuscleRole) -> Table {
    match role {
        MuscleRole::Primary => Table::ExercisePrimaryMuscles,
        MuscleRole::Synergist => Table::ExerciseSynergistMuscles,
    }
}

fn owner_filter(exercise_id: ExerciseID) -> Filter {
    Filter::eq("exercise_id", exercise_id.to_string())
}

// Role membership is a set; duplicate ids in the submitted list collapse.
fn muscle_rows(exercise_id: ExerciseID, muscle_ids: &[MuscleID]) -> Vec<Value> {
    let mut seen = HashSet::new();
    muscle_ids
        .iter()
        .filter(|id| seen.insert(**id))
        .map(|id| json!({ "exercise_id": *exercise_id, "muscle_id": **id }))
        .collect()
}

fn video_rows(exercise_id: ExerciseID, videos: &[VideoDraft]) -> Vec<Value> {
    videos
        .iter()
        .filter(|video| !video.url.trim().is_empty())
        .map(|video| {
            json!({
                "exercise_id": *exercise_id,
                "url": video.url,
                "title": (!video.title.is_empty()).then(|| video.title.clone()),
            })
        })
        .collect()
}
