//! Content library: spells and monsters
//!
//! Records are plain data loaded from JSON tables. Adding a spell or monster
//! needs no code change, only a record that satisfies the schema.

mod challenge;
mod library;
mod monster;
mod spell;

pub use challenge::ChallengeRating;
pub use library::ContentLibrary;
pub use monster::{
    ActionDamage, ActionSave, AdditionalDamage, Monster, MonsterAction, MonsterTrait,
};
pub use spell::{
    HealingModifier, Spell, SpellAutomation, SpellDamage, SpellHealing, SpellSchool,
};
