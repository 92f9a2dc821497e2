//! Contest model and lifecycle state machine

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Contest database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Contest {
    pub id: Uuid,
    pub event_id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    #[sqlx(try_from = "String")]
    pub state: ContestState,
    /// Bumped on every state transition
    pub state_version: i64,
    pub budget: i32,
    pub max_entities: i32,
    pub deadline: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contest {
    /// Fail with a state error unless the current phase permits `action`
    pub fn ensure_permits(&self, action: Action) -> AppResult<()> {
        self.state.ensure_permits(action)
    }
}

/// Contest lifecycle phase.
///
/// Phases only move forward, one step at a time:
/// `setup -> open -> locked -> complete`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ContestState {
    #[default]
    Setup,
    Open,
    Locked,
    Complete,
}

impl ContestState {
    pub const ALL: [ContestState; 4] = [Self::Setup, Self::Open, Self::Locked, Self::Complete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Open => "open",
            Self::Locked => "locked",
            Self::Complete => "complete",
        }
    }

    /// The only phase this one may move to
    pub fn successor(&self) -> Option<Self> {
        match self {
            Self::Setup => Some(Self::Open),
            Self::Open => Some(Self::Locked),
            Self::Locked => Some(Self::Complete),
            Self::Complete => None,
        }
    }

    /// Permission table for every gated action
    pub fn permits(&self, action: Action) -> bool {
        match action {
            Action::EditConfig => !matches!(self, Self::Complete),
            Action::SubmitPicks => matches!(self, Self::Open),
            Action::ReadLeaderboard => !matches!(self, Self::Setup),
            Action::WriteOutcome => matches!(self, Self::Locked | Self::Complete),
            Action::JoinContest => matches!(self, Self::Setup | Self::Open),
            Action::ImportEntities => matches!(self, Self::Setup),
            Action::Transition => self.successor().is_some(),
        }
    }

    pub fn ensure_permits(&self, action: Action) -> AppResult<()> {
        if self.permits(action) {
            Ok(())
        } else {
            Err(AppError::invalid_state(*self, action))
        }
    }

    /// Validate a transition request, returning the new phase.
    ///
    /// Anything other than the immediate successor is rejected, which rules
    /// out skipping, rollback and no-op transitions.
    pub fn transition_to(&self, target: ContestState) -> AppResult<ContestState> {
        match self.successor() {
            Some(next) if next == target => Ok(next),
            _ => Err(AppError::invalid_state(*self, Action::Transition)),
        }
    }

    /// Leaderboards hide scoring while picks are still being made
    pub fn masks_standings(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for ContestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown contest state
#[derive(Debug, thiserror::Error)]
#[error("unknown contest state '{0}'")]
pub struct ParseStateError(pub String);

impl FromStr for ContestState {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "setup" => Ok(Self::Setup),
            "open" => Ok(Self::Open),
            "locked" => Ok(Self::Locked),
            "complete" => Ok(Self::Complete),
            other => Err(ParseStateError(other.to_string())),
        }
    }
}

impl TryFrom<String> for ContestState {
    type Error = ParseStateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Operations gated by the contest phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    EditConfig,
    SubmitPicks,
    ReadLeaderboard,
    WriteOutcome,
    JoinContest,
    ImportEntities,
    Transition,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::EditConfig => "edit contest config",
            Self::SubmitPicks => "submit picks",
            Self::ReadLeaderboard => "read leaderboard",
            Self::WriteOutcome => "write outcome",
            Self::JoinContest => "join contest",
            Self::ImportEntities => "import entities",
            Self::Transition => "change state",
        };
        f.write_str(label)
    }
}

/// Contest with its owning event's identity, used by list views
#[derive(Debug, Clone, FromRow)]
pub struct ContestListing {
    pub id: Uuid,
    pub event_id: Uuid,
    pub event_slug: String,
    pub event_name: String,
    pub slug: String,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub state: ContestState,
    pub budget: i32,
    pub max_entities: i32,
    pub deadline: DateTime<Utc>,
    pub member_count: i64,
    pub pick_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    use ContestState::*;

    #[test]
    fn test_forward_only_transitions() {
        assert_eq!(Setup.transition_to(Open).unwrap(), Open);
        assert_eq!(Open.transition_to(Locked).unwrap(), Locked);
        assert_eq!(Locked.transition_to(Complete).unwrap(), Complete);
    }

    #[test]
    fn test_rejects_skip_rollback_and_noop() {
        for from in ContestState::ALL {
            for to in ContestState::ALL {
                if from.successor() == Some(to) {
                    continue;
                }
                let err = from.transition_to(to).unwrap_err();
                assert!(matches!(
                    err,
                    AppError::InvalidState {
                        state,
                        action: Action::Transition
                    } if state == from
                ));
            }
        }
    }

    #[test]
    fn test_complete_is_terminal() {
        assert_eq!(Complete.successor(), None);
        assert!(!Complete.permits(Action::Transition));
    }

    #[test]
    fn test_permission_table() {
        let table = [
            (Action::EditConfig, [true, true, true, false]),
            (Action::SubmitPicks, [false, true, false, false]),
            (Action::ReadLeaderboard, [false, true, true, true]),
            (Action::WriteOutcome, [false, false, true, true]),
        ];
        for (action, expected) in table {
            for (state, allowed) in ContestState::ALL.into_iter().zip(expected) {
                assert_eq!(
                    state.permits(action),
                    allowed,
                    "{action} in {state}"
                );
            }
        }
    }

    #[test]
    fn test_submit_picks_rejected_when_locked() {
        let err = Locked.ensure_permits(Action::SubmitPicks).unwrap_err();
        assert_eq!(
            err.to_string(),
            "submit picks: action not allowed in state 'locked'"
        );
    }

    #[test]
    fn test_only_open_masks_standings() {
        assert!(Open.masks_standings());
        assert!(!Locked.masks_standings());
        assert!(!Complete.masks_standings());
    }

    #[test]
    fn test_parse_round_trip_and_ordering() {
        for state in ContestState::ALL {
            assert_eq!(state.as_str().parse::<ContestState>().unwrap(), state);
        }
        assert!("paused".parse::<ContestState>().is_err());
        assert!(Setup < Open && Open < Locked && Locked < Complete);
    }
}
