//! Internal representation of phylogenetic data.
//!
//! All readers normalize into [`PhyloData`], a map of observations keyed by
//! (taxon, character) with a [`Character`] definition per column, and all
//! writers render from it. The representation is deliberately redundant:
//! derived views such as the matrix projection are recomputed on demand so
//! they can never go stale.

mod character;
mod data;

pub use character::Character;
pub use data::{PhyloData, SYMBOL_ALPHABET};
