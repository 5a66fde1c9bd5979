use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the pair an order or return refers to.
///
/// Leg A is the dependent instrument of the hedge regression, leg B the
/// independent one: `spread = A - hedge_ratio * B - intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Leg {
    A,
    B,
}

/// Spread position held by the strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PositionState {
    #[default]
    Flat,
    /// Long A, short B.
    LongSpread,
    /// Short A, long B.
    ShortSpread,
}

impl PositionState {
    pub fn is_flat(&self) -> bool {
        matches!(self, PositionState::Flat)
    }

    /// Target net weights on (A, B) for this state with `leg_weight` per leg.
    pub fn target_weights(&self, leg_weight: f64) -> LegWeights {
        match self {
            PositionState::Flat => LegWeights { a: 0.0, b: 0.0 },
            PositionState::LongSpread => LegWeights {
                a: leg_weight,
                b: -leg_weight,
            },
            PositionState::ShortSpread => LegWeights {
                a: -leg_weight,
                b: leg_weight,
            },
        }
    }
}

impl fmt::Display for PositionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionState::Flat => write!(f, "flat"),
            PositionState::LongSpread => write!(f, "long spread"),
            PositionState::ShortSpread => write!(f, "short spread"),
        }
    }
}

/// Target net exposure on each leg as a fraction of portfolio value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegWeights {
    pub a: f64,
    pub b: f64,
}

impl LegWeights {
    pub fn get(&self, leg: Leg) -> f64 {
        match leg {
            Leg::A => self.a,
            Leg::B => self.b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_flat() {
        assert_eq!(PositionState::default(), PositionState::Flat);
        assert!(PositionState::default().is_flat());
    }

    #[test]
    fn target_weights_per_state() {
        let long = PositionState::LongSpread.target_weights(0.5);
        assert_eq!((long.a, long.b), (0.5, -0.5));

        let short = PositionState::ShortSpread.target_weights(0.5);
        assert_eq!((short.a, short.b), (-0.5, 0.5));

        let flat = PositionState::Flat.target_weights(0.5);
        assert_eq!(flat.get(Leg::A), 0.0);
        assert_eq!(flat.get(Leg::B), 0.0);
    }
}
