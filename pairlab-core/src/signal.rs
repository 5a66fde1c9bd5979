//! Position state machine: z-score crossings → spread position transitions.
//!
//! Rules are evaluated in priority order; the first match wins:
//! 1. Flat & z ≥ entry → ShortSpread
//! 2. Flat & z ≤ −entry → LongSpread
//! 3. ShortSpread & z ≤ exit → Flat
//! 4. LongSpread & z ≥ −exit → Flat
//! 5. otherwise hold
//!
//! With `0 < exit < entry` at most one rule can match per step.

use serde::{Deserialize, Serialize};

use crate::domain::{EventKind, PositionState};
use crate::error::BacktestError;

pub const DEFAULT_ENTRY_THRESHOLD: f64 = 2.0;
pub const DEFAULT_EXIT_THRESHOLD: f64 = 1.0;

/// Validated symmetric entry/exit thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    entry: f64,
    exit: f64,
}

impl Thresholds {
    /// Requires both thresholds finite, positive, and `exit < entry`.
    pub fn new(entry: f64, exit: f64) -> Result<Self, BacktestError> {
        let reason = if !entry.is_finite() || !exit.is_finite() {
            Some("thresholds must be finite")
        } else if entry <= 0.0 || exit <= 0.0 {
            Some("thresholds must be positive")
        } else if exit >= entry {
            Some("exit threshold must be strictly below entry threshold")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(BacktestError::InvalidThresholds {
                entry,
                exit,
                reason,
            }),
            None => Ok(Self { entry, exit }),
        }
    }

    pub fn entry(&self) -> f64 {
        self.entry
    }

    pub fn exit(&self) -> f64 {
        self.exit
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            entry: DEFAULT_ENTRY_THRESHOLD,
            exit: DEFAULT_EXIT_THRESHOLD,
        }
    }
}

/// Outcome of one state machine step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub next: PositionState,
    pub event: Option<EventKind>,
}

impl Transition {
    fn hold(state: PositionState) -> Self {
        Self {
            next: state,
            event: None,
        }
    }

    fn fire(kind: EventKind) -> Self {
        Self {
            next: kind.resulting_state(),
            event: Some(kind),
        }
    }
}

/// Pure transition function. A NaN z-score matches no rule and holds.
pub fn transition(state: PositionState, zscore: f64, thresholds: &Thresholds) -> Transition {
    let Thresholds { entry, exit } = *thresholds;
    match state {
        PositionState::Flat if zscore >= entry => Transition::fire(EventKind::EnterShortSpread),
        PositionState::Flat if zscore <= -entry => Transition::fire(EventKind::EnterLongSpread),
        PositionState::ShortSpread if zscore <= exit => {
            Transition::fire(EventKind::ExitShortSpread)
        }
        PositionState::LongSpread if zscore >= -exit => Transition::fire(EventKind::ExitLongSpread),
        _ => Transition::hold(state),
    }
}
