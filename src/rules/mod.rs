//! Core rules math
//!
//! Pure formulas with no side effects: ability modifiers, proficiency
//! progression, the skill table and spellcasting numbers.

mod ability;
mod creature;

pub use ability::{
    ability_modifier, default_spellcasting_ability, normalize_skill, proficiency_bonus,
    skill_ability, Ability, AbilityScores, Skill, DEFAULT_SKILL_ABILITY,
};
pub use creature::Creature;

use crate::character::Character;

/// `8 + proficiency bonus + spellcasting ability modifier`
pub fn spell_save_dc(character: &Character) -> i32 {
    8 + character.proficiency_bonus + character.spellcasting_modifier()
}

/// `proficiency bonus + spellcasting ability modifier`
pub fn spell_attack_bonus(character: &Character) -> i32 {
    character.proficiency_bonus + character.spellcasting_modifier()
}
