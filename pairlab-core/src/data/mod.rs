//! Price alignment for the two legs of a pair

pub mod align;

pub use align::{align_pair, align_price_maps, AlignedSeriesPair};
