//! Static battle content.
//!
//! `battle-content` owns the data tables the simulator consumes as opaque
//! lookups: classes with growth curves, skills, and equipment, all loaded
//! from embedded RON files into a [`Catalog`] that implements the
//! `battle-core` oracle traits.

mod catalog;
pub mod loaders;

pub use catalog::Catalog;
