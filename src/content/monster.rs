//! Monster definitions

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ChallengeRating;
use crate::combat::{DamageModifier, DamageProfile, DamageType};
use crate::dice::DiceExpression;
use crate::error::{Result, RulesError};
use crate::rules::{ability_modifier, normalize_skill, Ability, AbilityScores, Creature};

/// A passive trait ("Pack Tactics", "Sunlight Sensitivity")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterTrait {
    pub name: String,
    pub description: String,
}

/// Secondary damage rolled alongside an action's main damage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalDamage {
    pub dice: String,
    pub damage_type: DamageType,
}

/// Damage an action deals on a hit (modifier included in `dice`, e.g. "2d6+4")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDamage {
    pub dice: String,
    pub damage_type: DamageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional: Option<AdditionalDamage>,
}

/// A saving throw an action forces instead of an attack roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSave {
    pub ability: Ability,
    pub dc: i32,
    #[serde(default)]
    pub half_on_success: bool,
}

/// An action or legendary action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterAction {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack_bonus: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<ActionDamage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save: Option<ActionSave>,
}

/// A monster definition from the content library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    /// Identifier; filled from the table key when loading
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub size: String,
    #[serde(rename = "type")]
    pub creature_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<String>,
    pub armor_class: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor_desc: Option<String>,
    pub hit_points: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hit_dice: Option<String>,
    /// Movement mode ("walk", "fly", ...) -> feet
    pub speed: BTreeMap<String, u32>,
    pub abilities: AbilityScores,
    /// Declared saving throw bonuses (totals, as printed)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub saving_throws: BTreeMap<Ability, i32>,
    /// Declared skill bonuses (totals, as printed)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub skills: BTreeMap<String, i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub damage_vulnerabilities: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub damage_resistances: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub damage_immunities: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub condition_immunities: Vec<String>,
    #[serde(default)]
    pub senses: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub challenge_rating: ChallengeRating,
    pub proficiency_bonus: i32,
    #[serde(default)]
    pub special_abilities: Vec<MonsterTrait>,
    #[serde(default)]
    pub actions: Vec<MonsterAction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub legendary_actions: Vec<MonsterAction>,
}

impl Monster {
    /// XP this monster is worth
    pub fn xp(&self) -> u32 {
        self.challenge_rating.xp()
    }

    /// Find an action or legendary action by name (case-insensitive)
    pub fn action(&self, name: &str) -> Option<&MonsterAction> {
        let name = name.trim();
        self.actions
            .iter()
            .chain(self.legendary_actions.iter())
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Resistances, immunities and vulnerabilities that name a single damage type
    pub fn damage_profile(&self) -> DamageProfile {
        DamageProfile::from_lists(
            &self.damage_vulnerabilities,
            &self.damage_resistances,
            &self.damage_immunities,
        )
    }

    /// Check authoring invariants: dice syntax in hit dice and actions
    pub fn validate(&self) -> Result<()> {
        if self.hit_points < 1 {
            return Err(RulesError::InvalidContent {
                id: self.id.clone(),
                reason: format!("hit points must be positive, got {}", self.hit_points),
            });
        }
        if let Some(hit_dice) = &self.hit_dice {
            DiceExpression::parse(hit_dice)?;
        }
        for action in self.actions.iter().chain(self.legendary_actions.iter()) {
            if let Some(damage) = &action.damage {
                DiceExpression::parse(&damage.dice)?;
                if let Some(additional) = &damage.additional {
                    DiceExpression::parse(&additional.dice)?;
                }
            }
        }
        Ok(())
    }
}

impl Creature for Monster {
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

    /// Backed out of the declared total: `declared - ability modifier`
    fn skill_proficiency(&self, skill: &str, ability: Ability) -> i32 {
        let wanted = normalize_skill(skill);
        self.skills
            .iter()
            .find(|(name, _)| normalize_skill(name) == wanted)
            .map(|(_, declared)| declared - ability_modifier(self.abilities.get(ability)))
            .unwrap_or(0)
    }

    /// Backed out of the declared total: `declared - ability modifier`
    fn save_proficiency(&self, ability: Ability) -> i32 {
        self.saving_throws
            .get(&ability)
            .map(|declared| declared - ability_modifier(self.abilities.get(ability)))
            .unwrap_or(0)
    }

    fn damage_response(&self, damage_type: DamageType) -> DamageModifier {
        self.damage_profile().get(damage_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lich_like() -> Monster {
        serde_json::from_str(
            r#"{
                "name": "Grave Warden",
                "size": "Medium",
                "type": "undead",
                "armor_class": 15,
                "hit_points": 45,
                "hit_dice": "7d8+14",
                "speed": {"walk": 30},
                "abilities": {"strength": 14, "dexterity": 12, "constitution": 14,
                              "intelligence": 10, "wisdom": 13, "charisma": 8},
                "saving_throws": {"wisdom": 7, "constitution": 4},
                "skills": {"perception": 5},
                "damage_vulnerabilities": ["radiant"],
                "damage_resistances": ["necrotic"],
                "damage_immunities": ["poison"],
                "condition_immunities": ["poisoned"],
                "senses": ["darkvision 60 ft."],
                "languages": ["Common"],
                "challenge_rating": "2",
                "proficiency_bonus": 2,
                "actions": [
                    {"name": "Longsword", "description": "Melee Weapon Attack.",
                     "attack_bonus": 4,
                     "damage": {"dice": "1d8+2", "damage_type": "slashing",
                                "additional": {"dice": "1d6", "damage_type": "necrotic"}}}
                ],
                "legendary_actions": [
                    {"name": "Grasp", "description": "Reaches out.", "attack_bonus": 4}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_save_bonus_is_backed_out() {
        let warden = lich_like();
        // Declared +7 with Wisdom 13 (+1): implied proficiency 6, not the formula's 2
        assert_eq!(warden.save_proficiency(Ability::Wisdom), 6);
        assert_eq!(warden.save_modifier(Ability::Wisdom), 7);
        // Undeclared save: ability modifier only
        assert_eq!(warden.save_modifier(Ability::Dexterity), 1);
    }

    #[test]
    fn test_skill_bonus_is_backed_out() {
        let warden = lich_like();
        assert_eq!(warden.skill_modifier("Perception"), 5);
        assert_eq!(warden.skill_modifier("stealth"), 1);
    }

    #[test]
    fn test_damage_response() {
        let warden = lich_like();
        assert_eq!(warden.damage_response(DamageType::Radiant), DamageModifier::Vulnerable);
        assert_eq!(warden.damage_response(DamageType::Necrotic), DamageModifier::Resistant);
        assert_eq!(warden.damage_response(DamageType::Poison), DamageModifier::Immune);
        assert_eq!(warden.damage_response(DamageType::Fire), DamageModifier::Normal);
    }

    #[test]
    fn test_action_lookup() {
        let warden = lich_like();
        assert!(warden.action("longsword").is_some());
        assert!(warden.action("GRASP").is_some());
        assert!(warden.action("bite").is_none());
        assert_eq!(warden.xp(), 450);
    }

    #[test]
    fn test_validate_rejects_bad_dice() {
        let mut warden = lich_like();
        assert!(warden.validate().is_ok());
        warden.actions[0].damage.as_mut().unwrap().dice = "1q8".to_string();
        assert!(warden.validate().is_err());
    }

    #[test]
    fn test_unknown_challenge_rating_rejected() {
        let json = serde_json::to_string(&lich_like()).unwrap().replace("\"challenge_rating\":2.0", "\"challenge_rating\":2.5");
        assert!(serde_json::from_str::<Monster>(&json).is_err());
    }
}
