//! Spell definitions

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combat::{DamageType, Scaling};
use crate::dice::DiceExpression;
use crate::error::{Result, RulesError};
use crate::rules::Ability;

/// Schools of magic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpellSchool {
    Abjuration,
    Conjuration,
    Divination,
    Enchantment,
    Evocation,
    Illusion,
    Necromancy,
    Transmutation,
}

impl fmt::Display for SpellSchool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SpellSchool::Abjuration => "Abjuration",
            SpellSchool::Conjuration => "Conjuration",
            SpellSchool::Divination => "Divination",
            SpellSchool::Enchantment => "Enchantment",
            SpellSchool::Evocation => "Evocation",
            SpellSchool::Illusion => "Illusion",
            SpellSchool::Necromancy => "Necromancy",
            SpellSchool::Transmutation => "Transmutation",
        };
        write!(f, "{}", s)
    }
}

/// Which resolution algorithm a spell uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellAutomation {
    /// Target saves against the caster's DC, then damage is rolled
    #[serde(alias = "damage_with_save", alias = "save")]
    DamageSave,
    /// Damage lands with no attack roll or save
    #[serde(alias = "automatic_hit", alias = "auto_damage")]
    AutoHit,
    /// Restores hit points
    #[serde(alias = "heal")]
    Healing,
    /// No mechanical effect; resolution belongs to the narrative layer
    #[serde(alias = "other", alias = "none")]
    Narrative,
}

impl fmt::Display for SpellAutomation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SpellAutomation::DamageSave => "damage_save",
            SpellAutomation::AutoHit => "auto_hit",
            SpellAutomation::Healing => "healing",
            SpellAutomation::Narrative => "narrative",
        };
        write!(f, "{}", s)
    }
}

/// Damage a spell deals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellDamage {
    pub damage_type: DamageType,
    /// Base dice expression at the spell's own level
    pub dice: String,
    #[serde(default)]
    pub modifier: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling: Option<Scaling>,
    /// Half damage (rounded down) when the target saves
    #[serde(default)]
    pub half_on_save: bool,
}

/// Where the flat term of a heal comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealingModifier {
    /// The caster's spellcasting ability modifier
    #[default]
    SpellcastingAbility,
    /// Dice only
    None,
}

/// Healing a spell restores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellHealing {
    pub dice: String,
    #[serde(default)]
    pub modifier: HealingModifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling: Option<Scaling>,
}

/// A spell definition from the content library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spell {
    /// Identifier; filled from the table key when loading
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// 0 for cantrips, up to 9
    pub level: u8,
    pub school: SpellSchool,
    pub casting_time: String,
    pub range: String,
    pub duration: String,
    pub components: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub higher_levels: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<SpellDamage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub healing: Option<SpellHealing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saving_throw: Option<Ability>,
    #[serde(default)]
    pub classes: Vec<String>,
    pub automation: SpellAutomation,
}

impl Spell {
    /// Whether this is a cantrip
    pub fn is_cantrip(&self) -> bool {
        self.level == 0
    }

    /// Whether a class can cast this spell
    pub fn available_to(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c.eq_ignore_ascii_case(class.trim()))
    }

    /// Damage block, required by damage automations
    pub fn damage_block(&self) -> Result<&SpellDamage> {
        self.damage.as_ref().ok_or_else(|| RulesError::MissingEffectBlock {
            spell: self.id.clone(),
            block: "damage",
        })
    }

    /// Healing block, required by the healing automation
    pub fn healing_block(&self) -> Result<&SpellHealing> {
        self.healing.as_ref().ok_or_else(|| RulesError::MissingEffectBlock {
            spell: self.id.clone(),
            block: "healing",
        })
    }

    /// Check authoring invariants: level range, required blocks, dice syntax
    pub fn validate(&self) -> Result<()> {
        if self.level > 9 {
            return Err(RulesError::InvalidContent {
                id: self.id.clone(),
                reason: format!("spell level {} is above 9", self.level),
            });
        }
        match self.automation {
            SpellAutomation::DamageSave | SpellAutomation::AutoHit => {
                self.damage_block()?;
            }
            SpellAutomation::Healing => {
                self.healing_block()?;
            }
            SpellAutomation::Narrative => {}
        }
        if let Some(damage) = &self.damage {
            DiceExpression::parse(&damage.dice)?;
        }
        if let Some(healing) = &self.healing {
            DiceExpression::parse(&healing.dice)?;
        }
        Ok(())
    }
}
