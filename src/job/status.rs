//! Job status definitions
//!
//! A job moves `queued -> running -> {done, error}`. Re-analysis resets any
//! state back to `queued`; that reset is the only backward move.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    /// Job is recorded and waiting for its run to start
    Queued,

    /// Analysis is in progress
    Running,

    /// Analysis finished and the result is stored
    Done,

    /// Analysis failed; the error detail is stored
    Error,
}

impl JobStatus {
    /// Returns true for `Done` and `Error`
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }

    /// Whether a run may move a job from `self` to `next`
    ///
    /// Resets to `Queued` go through the store's `reset` and are not
    /// covered here.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (Self::Queued, Self::Running) | (Self::Running, Self::Done) | (Self::Running, Self::Error)
        )
    }

    /// Converts the status to its database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Done => "done",
            Self::Error => "error",
        }
    }

    /// Parses a status from its database string representation
    ///
    /// Returns None if the string doesn't match any known status.
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "queued" => Some(Self::Queued),
            "running" => Some(Self::Running),
            "done" => Some(Self::Done),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Returns all possible statuses
    pub fn all() -> [Self; 4] {
        [Self::Queued, Self::Running, Self::Done, Self::Error]
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}
