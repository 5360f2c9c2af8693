//! Common test utilities - RulesTest harness with scripted dice

#![allow(dead_code)]

use std::sync::Arc;

use tabletop_rules::content::ContentLibrary;
use tabletop_rules::rules::{Ability, AbilityScores};
use tabletop_rules::{Character, DiceSource, Engine, Monster, ScriptedDice};

/// Engine wired to a scripted dice source the test can inspect
pub struct RulesTest {
    pub engine: Engine,
    pub dice: Arc<ScriptedDice>,
}

impl RulesTest {
    /// Built-in content, dice replaying `faces`
    pub fn scripted(faces: impl Into<Vec<u32>>) -> Self {
        Self::with_library(builtin(), faces)
    }

    /// Custom content, dice replaying `faces`
    pub fn with_library(library: ContentLibrary, faces: impl Into<Vec<u32>>) -> Self {
        let dice = Arc::new(ScriptedDice::new(faces));
        let engine = Engine::new(library, dice.clone() as Arc<dyn DiceSource>);
        Self { engine, dice }
    }

    /// Dice rolled so far
    pub fn rolled(&self) -> usize {
        self.dice.rolled()
    }
}

pub fn builtin() -> ContentLibrary {
    ContentLibrary::builtin().expect("built-in content loads")
}

/// Level 5 rogue, DEX 14, proficient in Acrobatics
pub fn acrobat() -> Character {
    Character::new(
        "pc-acrobat",
        "Sera",
        "rogue",
        5,
        AbilityScores::new(10, 14, 12, 10, 12, 10),
    )
    .with_skill("Acrobatics")
    .with_save(Ability::Dexterity)
    .with_armor_class(14)
    .with_hit_points(33, 33)
}

/// Level 5 wizard, INT 18, three 3rd-level slots
pub fn evoker() -> Character {
    Character::new(
        "pc-evoker",
        "Tamsin",
        "wizard",
        5,
        AbilityScores::new(8, 14, 14, 18, 12, 10),
    )
    .with_spellcasting(Ability::Intelligence)
    .with_slots(1, 4)
    .with_slots(2, 3)
    .with_slots(3, 2)
    .with_known_spell("fireball")
    .with_known_spell("magic-missile")
}

/// Level 3 cleric, WIS 16
pub fn healer() -> Character {
    Character::new(
        "pc-healer",
        "Bram",
        "cleric",
        3,
        AbilityScores::new(14, 10, 14, 10, 16, 12),
    )
    .with_spellcasting(Ability::Wisdom)
    .with_save(Ability::Wisdom)
    .with_armor_class(18)
}

/// A monster with a single +6 attack dealing 2d6+4
pub fn brute() -> Monster {
    serde_json::from_value(serde_json::json!({
        "id": "brute",
        "name": "Brute",
        "size": "Medium",
        "type": "humanoid",
        "armor_class": 13,
        "hit_points": 45,
        "hit_dice": "6d8+18",
        "speed": {"walk": 30},
        "abilities": {"strength": 18, "dexterity": 12, "constitution": 16,
                      "intelligence": 8, "wisdom": 10, "charisma": 8},
        "challenge_rating": 2,
        "proficiency_bonus": 2,
        "actions": [
            {"name": "Maul", "description": "Melee Weapon Attack: +6 to hit, reach 5 ft., one target.",
             "attack_bonus": 6,
             "damage": {"dice": "2d6+4", "damage_type": "bludgeoning"}}
        ]
    }))
    .expect("brute parses")
}
