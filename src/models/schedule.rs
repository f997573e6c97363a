//! Schedule summary and scheduling errors.

use crate::models::game::MatchId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary of the current schedule. Replaced wholesale on every generation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// Number of team pairs that produced at least one match.
    pub total_rounds: u32,
    pub total_time_slots: u32,
    pub courts_used: u32,
    /// In (time slot, court) order.
    pub match_ids: Vec<MatchId>,
    pub created_at: DateTime<Utc>,
}

/// Errors raised by the scheduling core.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScheduleError {
    /// The slot assigner opened more slots than any feasible schedule needs.
    SlotLimitExceeded { limit: u32, unscheduled: usize },
}

impl std::fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleError::SlotLimitExceeded { limit, unscheduled } => write!(
                f,
                "Scheduling gave up after {} time slots with {} match(es) still unplaced",
                limit, unscheduled
            ),
        }
    }
}

impl std::error::Error for ScheduleError {}
