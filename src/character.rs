//! Character snapshots
//!
//! A snapshot is a read-only value handed in per call. The engine never
//! stores or mutates it; advancement and hit point bookkeeping belong to the
//! caller.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::rules::{
    default_spellcasting_ability, normalize_skill, proficiency_bonus, Ability, AbilityScores,
    Creature,
};

/// Current and maximum hit points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitPoints {
    pub current: i32,
    pub max: i32,
}

/// A player character snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub class: String,
    /// Character level, 1-20
    pub level: u8,
    pub abilities: AbilityScores,
    pub hit_points: HitPoints,
    pub armor_class: i32,
    pub proficiency_bonus: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spellcasting_ability: Option<Ability>,
    /// Slot level -> number of slots
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub spell_slots: BTreeMap<u8, u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub known_spells: Vec<String>,
    /// Skill name -> proficiency contribution (e.g. 3 proficient, 6 expertise)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub skills: BTreeMap<String, i32>,
    /// Ability -> saving throw proficiency contribution
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub saving_throws: BTreeMap<Ability, i32>,
}

impl Character {
    /// Create a snapshot with derived proficiency and default defenses
    pub fn new(id: &str, name: &str, class: &str, level: u8, abilities: AbilityScores) -> Self {
        let level = level.clamp(1, 20);
        Self {
            id: id.to_string(),
            name: name.to_string(),
            class: class.to_string(),
            level,
            abilities,
            hit_points: HitPoints { current: 10, max: 10 },
            armor_class: 10 + abilities.modifier(Ability::Dexterity),
            proficiency_bonus: proficiency_bonus(level),
            spellcasting_ability: None,
            spell_slots: BTreeMap::new(),
            known_spells: Vec::new(),
            skills: BTreeMap::new(),
            saving_throws: BTreeMap::new(),
        }
    }

    pub fn with_hit_points(mut self, current: i32, max: i32) -> Self {
        self.hit_points = HitPoints { current, max };
        self
    }

    pub fn with_armor_class(mut self, armor_class: i32) -> Self {
        self.armor_class = armor_class;
        self
    }

    pub fn with_spellcasting(mut self, ability: Ability) -> Self {
        self.spellcasting_ability = Some(ability);
        self
    }

    /// Mark a skill as proficient with the character's proficiency bonus
    pub fn with_skill(mut self, skill: &str) -> Self {
        self.skills
            .insert(normalize_skill(skill), self.proficiency_bonus);
        self
    }

    /// Mark a skill as doubled-proficiency
    pub fn with_expertise(mut self, skill: &str) -> Self {
        self.skills
            .insert(normalize_skill(skill), self.proficiency_bonus * 2);
        self
    }

    pub fn with_save(mut self, ability: Ability) -> Self {
        self.saving_throws.insert(ability, self.proficiency_bonus);
        self
    }

    pub fn with_known_spell(mut self, spell_id: &str) -> Self {
        self.known_spells.push(spell_id.to_string());
        self
    }

    pub fn with_slots(mut self, level: u8, count: u32) -> Self {
        self.spell_slots.insert(level, count);
        self
    }

    /// Spellcasting ability, falling back to the class default
    pub fn casting_ability(&self) -> Option<Ability> {
        self.spellcasting_ability
            .or_else(|| default_spellcasting_ability(&self.class))
    }

    /// Modifier of the spellcasting ability, 0 for non-casters
    pub fn spellcasting_modifier(&self) -> i32 {
        match self.casting_ability() {
            Some(ability) => self.abilities.modifier(ability),
            None => {
                warn!(
                    character = %self.id,
                    class = %self.class,
                    "no spellcasting ability; using modifier 0"
                );
                0
            }
        }
    }

    /// Whether the snapshot lists a spell as known
    pub fn knows_spell(&self, spell_id: &str) -> bool {
        self.known_spells.iter().any(|s| s == spell_id)
    }

    /// Slots available at a level
    pub fn slots_at(&self, level: u8) -> u32 {
        self.spell_slots.get(&level).copied().unwrap_or(0)
    }
}

impl Creature for Character {
    fn name(&self) -> &str {
        &self.name
    }

    fn ability_score(&self, ability: Ability) -> i32 {
        self.abilities.get(ability)
    }

    fn armor_class(&self) -> i32 {
        self.armor_class
    }

    fn proficiency_bonus(&self) -> i32 {
        self.proficiency_bonus
    }

    fn skill_proficiency(&self, skill: &str, _ability: Ability) -> i32 {
        let wanted = normalize_skill(skill);
        self.skills
            .iter()
            .find(|(name, _)| normalize_skill(name) == wanted)
            .map(|(_, bonus)| *bonus)
            .unwrap_or(0)
    }

    fn save_proficiency(&self, ability: Ability) -> i32 {
        self.saving_throws.get(&ability).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rogue() -> Character {
        Character::new("pc-1", "Vex", "rogue", 5, AbilityScores::new(10, 14, 12, 13, 11, 8))
            .with_skill("Acrobatics")
            .with_expertise("stealth")
            .with_save(Ability::Dexterity)
    }

    #[test]
    fn test_new_derives_proficiency() {
        let pc = rogue();
        assert_eq!(pc.proficiency_bonus, 3);
        assert_eq!(pc.armor_class, 12);
    }

    #[test]
    fn test_skill_modifiers() {
        let pc = rogue();
        assert_eq!(pc.skill_modifier("acrobatics"), 5);
        assert_eq!(pc.skill_modifier("Stealth"), 8);
        assert_eq!(pc.skill_modifier("athletics"), 0);
        assert_eq!(pc.skill_modifier("persuasion"), -1);
    }

    #[test]
    fn test_save_modifiers() {
        let pc = rogue();
        assert_eq!(pc.save_modifier(Ability::Dexterity), 5);
        assert_eq!(pc.save_modifier(Ability::Constitution), 1);
    }

    #[test]
    fn test_casting_ability_fallback() {
        let wizard = Character::new("pc-2", "Ilsa", "Wizard", 3, AbilityScores::new(8, 14, 12, 17, 10, 10));
        assert_eq!(wizard.casting_ability(), Some(Ability::Intelligence));
        assert_eq!(wizard.spellcasting_modifier(), 3);

        let fighter = Character::new("pc-3", "Brom", "fighter", 3, AbilityScores::default());
        assert_eq!(fighter.casting_ability(), None);
        assert_eq!(fighter.spellcasting_modifier(), 0);
    }

    #[test]
    fn test_snapshot_json() {
        let json = r#"{
            "id": "pc-9",
            "name": "Mira",
            "class": "cleric",
            "level": 4,
            "abilities": {"str": 12, "dex": 10, "con": 14, "int": 10, "wis": 16, "cha": 11},
            "hit_points": {"current": 20, "max": 31},
            "armor_class": 18,
            "proficiency_bonus": 2,
            "spell_slots": {"1": 4, "2": 3},
            "known_spells": ["cure-wounds"],
            "saving_throws": {"wis": 2, "cha": 2}
        }"#;
        let pc: Character = serde_json::from_str(json).unwrap();
        assert_eq!(pc.slots_at(2), 3);
        assert_eq!(pc.slots_at(3), 0);
        assert!(pc.knows_spell("cure-wounds"));
        assert_eq!(pc.save_modifier(Ability::Wisdom), 5);
        assert_eq!(pc.spellcasting_modifier(), 3);
    }
}
