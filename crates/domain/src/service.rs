use log::{debug, error};

use crate::{
    CreateError, DeleteError, Direction, DirectionRepository, DirectionService, Exercise,
    ExerciseDraft, ExerciseID, ExerciseRepository, ExerciseService, ExerciseWithRelations,
    Invitation, InvitationID, InvitationRepository, InvitationService, InvitationToken,
    MovementPattern, MovementPatternID, MovementPatternRepository, MovementPatternService, Muscle,
    MuscleID, MuscleRepository, MuscleService, Name, PasswordChangeOutcome, Profile, ReadError,
    Role, SessionRepository, SessionService, UpdateError,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: ExerciseRepository> ExerciseService for Service<R> {
    async fn get_exercises(&self) -> Result<Vec<ExerciseWithRelations>, ReadError> {
        log_on_error!(
            self.repository.read_exercises(),
            ReadError,
            "get",
            "exercises"
        )
    }

    async fn create_exercise(&self, draft: ExerciseDraft) -> Result<Exercise, CreateError> {
        log_on_error!(
            self.repository.create_exercise(draft),
            CreateError,
            "create",
            "exercise"
        )
    }

    async fn replace_exercise(
        &self,
        id: ExerciseID,
        draft: ExerciseDraft,
    ) -> Result<(), UpdateError> {
        log_on_error!(
            self.repository.replace_exercise(id, draft),
            UpdateError,
            "replace",
            "exercise"
        )
    }

    async fn delete_exercise(&self, id: ExerciseID) -> Result<ExerciseID, DeleteError> {
        log_on_error!(
            self.repository.delete_exercise(id),
            DeleteError,
            "delete",
            "exercise"
        )
    }
}

impl<R: MuscleRepository> MuscleService for Service<R> {
    async fn get_muscles(&self) -> Result<Vec<Muscle>, ReadError> {
        log_on_error!(self.repository.read_muscles(), ReadError, "get", "muscles")
    }

    async fn create_muscle(&self, name: Name) -> Result<Muscle, CreateError> {
        log_on_error!(
            self.repository.create_muscle(name),
            CreateError,
            "create",
            "muscle"
        )
    }

    async fn rename_muscle(&self, id: MuscleID, name: Name) -> Result<(), UpdateError> {
        log_on_error!(
            self.repository.rename_muscle(id, name),
            UpdateError,
            "rename",
            "muscle"
        )
    }

    async fn delete_muscle(&self, id: MuscleID) -> Result<MuscleID, DeleteError> {
        log_on_error!(
            self.repository.delete_muscle(id),
            DeleteError,
            "delete",
            "muscle"
        )
    }
}

impl<R: MovementPatternRepository> MovementPatternService for Service<R> {
    async fn get_movement_patterns(&self) -> Result<Vec<MovementPattern>, ReadError> {
        log_on_error!(
            self.repository.read_movement_patterns(),
            ReadError,
            "get",
            "movement patterns"
        )
    }

    async fn create_movement_pattern(&self, name: Name) -> Result<MovementPattern, CreateError> {
        log_on_error!(
            self.repository.create_movement_pattern(name),
            CreateError,
            "create",
            "movement pattern"
        )
    }

    async fn rename_movement_pattern(
        &self,
        id: MovementPatternID,
        name: Name,
    ) -> Result<(), UpdateError> {
        log_on_error!(
            self.repository.rename_movement_pattern(id, name),
            UpdateError,
            "rename",
            "movement pattern"
        )
    }

    async fn delete_movement_pattern(
        &self,
        id: MovementPatternID,
    ) -> Result<MovementPatternID, DeleteError> {
        log_on_error!(
            self.repository.delete_movement_pattern(id),
            DeleteError,
            "delete",
            "movement pattern"
        )
    }
}

impl<R: DirectionRepository> DirectionService for Service<R> {
    async fn get_directions(&self) -> Result<Vec<Direction>, ReadError> {
        log_on_error!(
            self.repository.read_directions(),
            ReadError,
            "get",
            "directions"
        )
    }
}

impl<R: InvitationRepository> InvitationService for Service<R> {
    async fn get_invitations(&self) -> Result<Vec<Invitation>, ReadError> {
        log_on_error!(
            self.repository.read_invitations(),
            ReadError,
            "get",
            "invitations"
        )
    }

    async fn create_invitation(&self, email: &str, role: Role) -> Result<Invitation, CreateError> {
        log_on_error!(
            self.repository.create_invitation(email, role),
            CreateError,
            "create",
            "invitation"
        )
    }

    async fn delete_invitation(&self, id: InvitationID) -> Result<InvitationID, DeleteError> {
        log_on_error!(
            self.repository.delete_invitation(id),
            DeleteError,
            "delete",
            "invitation"
        )
    }
}

impl<R: SessionRepository> SessionService for Service<R> {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Profile, ReadError> {
        log_on_error!(
            self.repository.sign_in(email, password),
            ReadError,
            "sign in",
            "session"
        )
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        token: Option<&InvitationToken>,
    ) -> Result<Profile, CreateError> {
        log_on_error!(
            self.repository.sign_up(email, password, token),
            CreateError,
            "sign up",
            "profile"
        )
    }

    async fn sign_out(&self) -> Result<(), DeleteError> {
        log_on_error!(
            self.repository.sign_out(),
            DeleteError,
            "sign out",
            "session"
        )
    }

    async fn get_session(&self) -> Result<Option<Profile>, ReadError> {
        log_on_error!(
            self.repository.current_session(),
            ReadError,
            "get",
            "session"
        )
    }

    async fn change_password(&self, new_password: &str) -> PasswordChangeOutcome {
        let outcome = self.repository.change_password(new_password).await;
        match &outcome {
            PasswordChangeOutcome::Success => {}
            PasswordChangeOutcome::Failure(reason) => {
                error!("failed to change password: {reason}");
            }
            PasswordChangeOutcome::Indeterminate => {
                debug!("password change not confirmed before timeout");
            }
        }
        outcome
    }
}
