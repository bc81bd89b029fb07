//! RON table loaders.
//!
//! Each loader parses one embedded data file into `battle-core` types and
//! validates it at load time: duplicate ids, out-of-range percentages, and
//! dangling references fail the load rather than surfacing mid-battle.

mod classes;
mod equipment;
mod skills;

pub use classes::{ClassSpec, load_classes};
pub use equipment::load_equipment;
pub use skills::load_skills;
