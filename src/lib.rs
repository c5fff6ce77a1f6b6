//! Propagate glosses between FLEx LIFT lexicon exports.
//!
//! Senses are correlated across two exports by a shared cross-reference
//! field (default type `CAWL`); candidate text collected from the source
//! database is merged into the target database's glosses.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
