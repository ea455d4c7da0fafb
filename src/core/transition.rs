//! Status transition policy
//!
//! Any status may move to any other status. The only rule is the
//! modifiability gate, which looks at the record's *current* status.

use crate::core::request::RequestStatus;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Status names the legacy gate treats as frozen. None of them is a
/// [`RequestStatus`], so under [`StatusPolicy::Permissive`] nothing is frozen.
const LEGACY_NON_MODIFIABLE: &[&str] = &["completed", "rejected"];

/// Which gate guards status updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
    /// Compare against the legacy frozen set: every record stays modifiable
    #[default]
    Permissive,
    /// `done` and `canceled` are terminal
    TerminalStates,
}

impl StatusPolicy {
    /// Whether a record whose status is `current` may change status
    pub fn can_be_modified(&self, current: RequestStatus) -> bool {
        match self {
            StatusPolicy::Permissive => !LEGACY_NON_MODIFIABLE.contains(&current.as_str()),
            StatusPolicy::TerminalStates => {
                !matches!(current, RequestStatus::Done | RequestStatus::Canceled)
            }
        }
    }
}

impl FromStr for StatusPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "permissive" => Ok(StatusPolicy::Permissive),
            "terminal_states" => Ok(StatusPolicy::TerminalStates),
            other => Err(anyhow::anyhow!(
                "unknown status policy '{}' (expected 'permissive' or 'terminal_states')",
                other
            )),
        }
    }
}
