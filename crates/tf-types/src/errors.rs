use thiserror::Error;

/// Main error type for team formation
#[derive(Error, Debug)]
pub enum TfError {
    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),

    #[error("Formation error: {0}")]
    Formation(#[from] FormationError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("A team formation run is already in progress")]
    Busy,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Problems with the participant roster handed to a run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("Participant with an empty username")]
    EmptyUsername,

    #[error("Username {username:?} has leading or trailing whitespace")]
    UntrimmedUsername { username: String },

    #[error("Duplicate username: {username}")]
    DuplicateUsername { username: String },

    #[error("Unknown speciality {speciality:?} declared by {username}")]
    UnknownSpeciality { username: String, speciality: String },
}

/// Problems with locked teams supplied alongside the roster
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormationError {
    #[error("Locked team {index} has no members")]
    EmptyLockedTeam { index: usize },

    #[error("Locked team member not in roster: {username}")]
    UnknownLockedMember { username: String },

    #[error("Participant {username} appears in more than one locked team")]
    MemberLockedTwice { username: String },

    #[error("Search worker failed: {message}")]
    WorkerFailed { message: String },
}

/// Result type alias for team formation operations
pub type TfResult<T> = Result<T, TfError>;

/// Macro for creating internal errors
#[macro_export]
macro_rules! internal_error {
    ($($arg:tt)*) => {
        $crate::TfError::Internal(format!($($arg)*))
    };
}

/// Macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::TfError::Config(format!($($arg)*))
    };
}
