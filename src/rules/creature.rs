//! The creature seam shared by character snapshots and monsters
//!
//! Resolvers never care whether a roll is made by a player character or a
//! monster; both expose their numbers through [`Creature`].

use super::ability::{ability_modifier, skill_ability, Ability};
use crate::combat::{DamageModifier, DamageType};

/// Read-only view of anything that can roll checks and be attacked
pub trait Creature {
    /// Display name used in roll descriptions
    fn name(&self) -> &str;

    fn ability_score(&self, ability: Ability) -> i32;

    fn armor_class(&self) -> i32;

    fn proficiency_bonus(&self) -> i32;

    /// Proficiency contribution to a skill on top of the ability modifier
    fn skill_proficiency(&self, skill: &str, ability: Ability) -> i32;

    /// Proficiency contribution to a saving throw on top of the ability modifier
    fn save_proficiency(&self, ability: Ability) -> i32;

    /// How this creature takes damage of a given type
    fn damage_response(&self, _damage_type: DamageType) -> DamageModifier {
        DamageModifier::Normal
    }

    fn ability_modifier(&self, ability: Ability) -> i32 {
        ability_modifier(self.ability_score(ability))
    }

    /// Ability modifier plus skill proficiency
    fn skill_modifier(&self, skill: &str) -> i32 {
        let ability = skill_ability(skill);
        self.ability_modifier(ability) + self.skill_proficiency(skill, ability)
    }

    /// Ability modifier plus save proficiency
    fn save_modifier(&self, ability: Ability) -> i32 {
        self.ability_modifier(ability) + self.save_proficiency(ability)
    }
}
