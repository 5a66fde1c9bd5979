//! Domain types for PairLab

pub mod event;
pub mod observation;
pub mod position;

pub use event::{EventKind, TradeEvent};
pub use observation::{Observation, PriceSeries};
pub use position::{Leg, LegWeights, PositionState};
