//! # Load State
//!
//! Sync run lifecycle state machine.
//!
//! A run moves through these states exactly once:
//!
//! ```text
//! Idle → DateChecked → Running → Committed
//!             ↓           ↓
//!             └───────────┴→ Aborted
//! ```
//!
//! `DateChecked → Aborted` is the idempotency gate closing: the date was
//! already in the store, so no pipeline ever starts. `Running → Aborted` is
//! a pipeline failure discarding the shared transaction.
//!
//! # Examples
//!
//! ```
//! use restaurant_sync::domain::value_objects::load_state::LoadState;
//!
//! let state = LoadState::Idle;
//! assert!(state.can_transition_to(LoadState::DateChecked));
//! assert!(!state.can_transition_to(LoadState::Committed));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of one sync run.
///
/// # Terminal States
///
/// - [`Committed`](LoadState::Committed) — all three batches staged and the
///   shared transaction committed
/// - [`Aborted`](LoadState::Aborted) — the gate closed or a pipeline failed;
///   nothing became visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadState {
    /// No work has happened yet.
    #[default]
    Idle,

    /// The date parsed and the store gate was probed.
    DateChecked,

    /// The three sub-pipelines are in flight on one shared transaction.
    Running,

    /// The shared transaction committed (terminal).
    Committed,

    /// The run ended without committing anything (terminal).
    Aborted,
}

impl LoadState {
    /// Returns true if this is a terminal state.
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Committed | Self::Aborted)
    }

    /// Returns true if this state can transition to the target state.
    ///
    /// # Examples
    ///
    /// ```
    /// use restaurant_sync::domain::value_objects::load_state::LoadState;
    ///
    /// assert!(LoadState::DateChecked.can_transition_to(LoadState::Running));
    /// assert!(LoadState::DateChecked.can_transition_to(LoadState::Aborted));
    /// assert!(!LoadState::Committed.can_transition_to(LoadState::Idle));
    /// ```
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Idle, Self::DateChecked)
                | (Self::DateChecked, Self::Running)
                | (Self::DateChecked, Self::Aborted)
                | (Self::Running, Self::Committed)
                | (Self::Running, Self::Aborted)
        )
    }

    /// Returns the valid next states from this state.
    #[must_use]
    pub fn valid_transitions(&self) -> Vec<Self> {
        match self {
            Self::Idle => vec![Self::DateChecked],
            Self::DateChecked => vec![Self::Running, Self::Aborted],
            Self::Running => vec![Self::Committed, Self::Aborted],
            Self::Committed | Self::Aborted => vec![],
        }
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "IDLE",
            Self::DateChecked => "DATE_CHECKED",
            Self::Running => "RUNNING",
            Self::Committed => "COMMITTED",
            Self::Aborted => "ABORTED",
        };
        write!(f, "{s}")
    }
}
