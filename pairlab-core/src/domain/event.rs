//! Trade events emitted by the position state machine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::position::PositionState;

/// Kind of position transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    EnterShortSpread,
    EnterLongSpread,
    ExitShortSpread,
    ExitLongSpread,
}

impl EventKind {
    /// The position state in effect after this event fires.
    pub fn resulting_state(&self) -> PositionState {
        match self {
            EventKind::EnterShortSpread => PositionState::ShortSpread,
            EventKind::EnterLongSpread => PositionState::LongSpread,
            EventKind::ExitShortSpread | EventKind::ExitLongSpread => PositionState::Flat,
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self, EventKind::EnterShortSpread | EventKind::EnterLongSpread)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::EnterShortSpread => "enter_short_spread",
            EventKind::EnterLongSpread => "enter_long_spread",
            EventKind::ExitShortSpread => "exit_short_spread",
            EventKind::ExitLongSpread => "exit_long_spread",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A position transition recorded during the trading phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    pub date: NaiveDate,
    pub kind: EventKind,
    pub zscore: f64,
}
