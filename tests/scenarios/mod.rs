//! Scenario tests for the rules engine
//!
//! - Checks: skill checks, saves, advantage handling
//! - Combat: monster attacks, criticals, damage response
//! - Spells: save-for-half damage, upcasting, healing, narrative spells
//! - Encounters: difficulty grading and generation

pub mod checks;
pub mod combat;
pub mod encounters;
pub mod spells;
