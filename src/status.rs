use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Scheduled,
    Cancelled,
    Completed,
}

/// How strictly status changes are checked.
///
/// `Permissive` lets any status move to any other status, which is how the
/// service has always behaved: a cancelled appointment can be put back to
/// `SCHEDULED` through a plain update, and cancelling a completed one simply
/// overwrites it. `Strict` only admits `SCHEDULED -> CANCELLED`,
/// `SCHEDULED -> COMPLETED` and same-status no-ops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransitionPolicy {
    #[default]
    Permissive,
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot move appointment from {from} to {to}")]
pub struct InvalidTransition {
    pub from: AppointmentStatus,
    pub to: AppointmentStatus,
}

impl AppointmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "SCHEDULED",
            AppointmentStatus::Cancelled => "CANCELLED",
            AppointmentStatus::Completed => "COMPLETED",
        }
    }

    /// The single gate every status mutation goes through.
    pub fn transition_to(
        self,
        next: AppointmentStatus,
        policy: TransitionPolicy,
    ) -> Result<AppointmentStatus, InvalidTransition> {
        if policy == TransitionPolicy::Permissive || self.can_move_strictly_to(next) {
            Ok(next)
        } else {
            Err(InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    fn can_move_strictly_to(self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        self == next || matches!((self, next), (Scheduled, Cancelled) | (Scheduled, Completed))
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SCHEDULED" => Ok(AppointmentStatus::Scheduled),
            "CANCELLED" => Ok(AppointmentStatus::Cancelled),
            "COMPLETED" => Ok(AppointmentStatus::Completed),
            other => Err(format!("unknown appointment status: {other}")),
        }
    }
}
