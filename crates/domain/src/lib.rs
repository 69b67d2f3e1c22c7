#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod direction;
mod error;
mod exercise;
mod invitation;
mod movement_pattern;
mod muscle;
mod name;
mod profile;
mod service;
mod session;

pub use direction::{Direction, DirectionID, DirectionRepository, DirectionService};
pub use error::{CreateError, DeleteError, ReadError, StorageError, UpdateError};
pub use exercise::{
    ChainType, ChainTypeError, Exercise, ExerciseDraft, ExerciseFilter, ExerciseID,
    ExerciseRepository, ExerciseService, ExerciseVideo, ExerciseWithRelations, Property,
    VideoDraft, VideoID,
};
pub use invitation::{
    Invitation, InvitationID, InvitationRepository, InvitationService, InvitationToken,
};
pub use movement_pattern::{
    MovementPattern, MovementPatternID, MovementPatternRepository, MovementPatternService,
};
pub use muscle::{Muscle, MuscleID, MuscleRepository, MuscleRole, MuscleService};
pub use name::{Name, NameError};
pub use profile::{Profile, ProfileID, Role, RoleError};
pub use service::Service;
pub use session::{
    PasswordChangeOutcome, SessionContext, SessionRepository, SessionService, SessionState,
};
