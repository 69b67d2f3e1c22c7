//! In-memory view of the hydrated exercise catalog.
//!
//! The view is swapped wholesale after every successful mutation rather
//! than patched locally; a full re-fetch is the price of never having a
//! partially updated view. There is no optimistic update path.

use std::cell::{Cell, RefCell};

use log::error;

use motus_domain::{
    CreateError, DeleteError, ExerciseDraft, ExerciseID, ExerciseRepository,
    ExerciseWithRelations, ReadError, UpdateError,
};

pub struct ExerciseCatalog<R> {
    repository: R,
    exercises: RefCell<Vec<ExerciseWithRelations>>,
    loading: Cell<bool>,
    error: RefCell<Option<String>>,
}

impl<R: ExerciseRepository> ExerciseCatalog<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            exercises: RefCell::new(vec![]),
            loading: Cell::new(false),
            error: RefCell::new(None),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Snapshot of the last successful fetch.
    #[must_use]
    pub fn current(&self) -> Vec<ExerciseWithRelations> {
        self.exercises.borrow().clone()
    }

    /// True only while the initial fetch or an explicit `refetch` is in
    /// flight. Mutations rebuild the view without raising this flag; they
    /// carry their own local saving state in the UI.
    #[must_use]
    pub fn loading(&self) -> bool {
        self.loading.get()
    }

    /// Message of the last failed fetch, cleared by the next successful one.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub async fn refetch(&self) -> Result<(), ReadError> {
        self.loading.set(true);
        let result = self.refresh().await;
        self.loading.set(false);
        result
    }

    pub async fn create(&self, draft: ExerciseDraft) -> Result<(), CreateError> {
        self.repository.create_exercise(draft).await?;
        self.refresh_after_mutation().await;
        Ok(())
    }

    pub async fn replace(&self, id: ExerciseID, draft: ExerciseDraft) -> Result<(), UpdateError> {
        self.repository.replace_exercise(id, draft).await?;
        self.refresh_after_mutation().await;
        Ok(())
    }

    pub async fn delete(&self, id: ExerciseID) -> Result<(), DeleteError> {
        self.repository.delete_exercise(id).await?;
        self.refresh_after_mutation().await;
        Ok(())
    }

    async fn refresh(&self) -> Result<(), ReadError> {
        match self.repository.read_exercises().await {
            Ok(exercises) => {
                *self.exercises.borrow_mut() = exercises;
                *self.error.borrow_mut() = None;
                Ok(())
            }
            Err(err) => {
                error!("failed to refresh exercise catalog: {err}");
                self.exercises.borrow_mut().clear();
                *self.error.borrow_mut() = Some(err.to_string());
                Err(err)
            }
        }
    }

    // The mutation itself succeeded; a failed rebuild is recorded in the
    // error state instead of failing the mutation.
    async fn refresh_after_mutation(&self) {
        let _ = self.refresh().await;
    }
}
