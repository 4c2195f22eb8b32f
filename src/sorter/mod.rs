//! Track distillation and ordering.
//!
//! [`distill`] projects raw playlist entries into [`DistilledTrack`]s carrying
//! album and artist frequencies over the whole playlist. [`order`] then
//! suppresses trivial single-member groups and applies four stable sorts so
//! tracks sharing albums and artists end up next to each other, largest
//! artist groups first.
//!
//! [`DistilledTrack`]: crate::types::DistilledTrack

mod distill;
mod order;

pub use distill::distill;
pub use order::{order, sort, suppress};
