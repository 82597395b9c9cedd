//! Inheritance resolution
//!
//! [`CompositionEngine`] flattens a ruleset and everything it extends into a
//! single rule text. Parents come first, in `extends` order, followed by the
//! ruleset's own rules.

mod cache;
mod engine;

pub use cache::CompositionCache;
pub use engine::{ComposedRuleset, CompositionEngine};
