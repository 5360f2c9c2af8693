//! Damage types, resistances and the damage/healing resolver
//!
//! Handles damage calculation with:
//! - Dice expressions with flat modifiers ("2d6+4")
//! - Critical hits doubling the dice (never the modifier)
//! - Per-level scaling of the base dice count
//! - Immunity (0%), resistance (50%) and vulnerability (200%)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::dice::{DiceExpression, DiceSource, RollResult};
use crate::error::Result;
use crate::rules::Creature;

/// Types of damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageType {
    /// Corrosive liquids, digestive enzymes
    Acid,
    /// Blunt force (maces, falls, constriction)
    Bludgeoning,
    /// Cold/ice damage
    Cold,
    /// Fire damage
    Fire,
    /// Pure magical energy
    Force,
    /// Lightning/electric damage
    Lightning,
    /// Necrotic/life-draining damage
    Necrotic,
    /// Piercing damage (arrows, bites, spears)
    Piercing,
    /// Poison damage
    Poison,
    /// Psychic/mental damage
    Psychic,
    /// Radiant/holy damage
    Radiant,
    /// Slashing damage (swords, claws)
    Slashing,
    /// Thunder/sonic damage
    Thunder,
}

impl FromStr for DamageType {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "acid" => Ok(DamageType::Acid),
            "bludgeoning" => Ok(DamageType::Bludgeoning),
            "cold" | "ice" => Ok(DamageType::Cold),
            "fire" => Ok(DamageType::Fire),
            "force" => Ok(DamageType::Force),
            "lightning" | "electric" => Ok(DamageType::Lightning),
            "necrotic" => Ok(DamageType::Necrotic),
            "piercing" => Ok(DamageType::Piercing),
            "poison" => Ok(DamageType::Poison),
            "psychic" => Ok(DamageType::Psychic),
            "radiant" => Ok(DamageType::Radiant),
            "slashing" => Ok(DamageType::Slashing),
            "thunder" | "sonic" => Ok(DamageType::Thunder),
            _ => Err(()),
        }
    }
}

impl fmt::Display for DamageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DamageType::Acid => "acid",
            DamageType::Bludgeoning => "bludgeoning",
            DamageType::Cold => "cold",
            DamageType::Fire => "fire",
            DamageType::Force => "force",
            DamageType::Lightning => "lightning",
            DamageType::Necrotic => "necrotic",
            DamageType::Piercing => "piercing",
            DamageType::Poison => "poison",
            DamageType::Psychic => "psychic",
            DamageType::Radiant => "radiant",
            DamageType::Slashing => "slashing",
            DamageType::Thunder => "thunder",
        };
        write!(f, "{}", s)
    }
}

/// Modifier for damage resistance/immunity/vulnerability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageModifier {
    /// Immune - takes 0% damage
    Immune,
    /// Resistant - takes 50% damage (rounded down)
    Resistant,
    /// Normal - takes 100% damage
    #[default]
    Normal,
    /// Vulnerable - takes 200% damage
    Vulnerable,
}

impl DamageModifier {
    /// Apply this modifier to damage amount
    pub fn apply(&self, damage: i32) -> i32 {
        match self {
            DamageModifier::Immune => 0,
            DamageModifier::Resistant => damage / 2,
            DamageModifier::Normal => damage,
            DamageModifier::Vulnerable => damage.saturating_mul(2),
        }
    }

    /// Narrative tag for a non-normal response ("resisted:fire")
    pub fn effect_tag(&self, damage_type: DamageType) -> Option<String> {
        let verb = match self {
            DamageModifier::Immune => "immune",
            DamageModifier::Resistant => "resisted",
            DamageModifier::Normal => return None,
            DamageModifier::Vulnerable => "vulnerable",
        };
        Some(format!("{}:{}", verb, damage_type))
    }
}

/// Damage profile for a creature (their resistances/immunities)
#[derive(Debug, Clone, Default)]
pub struct DamageProfile {
    modifiers: HashMap<DamageType, DamageModifier>,
}

impl DamageProfile {
    /// Create a new empty damage profile (all normal)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a profile from stat-block lists.
    ///
    /// Only entries naming a single damage type count; qualified phrases such
    /// as "slashing from nonmagical attacks" are left to the narrative layer.
    /// Immunity wins over resistance, which wins over vulnerability.
    pub fn from_lists(vulnerabilities: &[String], resistances: &[String], immunities: &[String]) -> Self {
        let mut profile = Self::new();
        for (entries, modifier) in [
            (vulnerabilities, DamageModifier::Vulnerable),
            (resistances, DamageModifier::Resistant),
            (immunities, DamageModifier::Immune),
        ] {
            for dtype in entries.iter().filter_map(|e| e.parse::<DamageType>().ok()) {
                profile.set(dtype, modifier);
            }
        }
        profile
    }

    /// Set a damage modifier for a type
    pub fn set(&mut self, dtype: DamageType, modifier: DamageModifier) {
        if modifier == DamageModifier::Normal {
            self.modifiers.remove(&dtype);
        } else {
            self.modifiers.insert(dtype, modifier);
        }
    }

    /// Get the modifier for a damage type
    pub fn get(&self, dtype: DamageType) -> DamageModifier {
        self.modifiers
            .get(&dtype)
            .copied()
            .unwrap_or(DamageModifier::Normal)
    }
}

/// Damage of one type after the target's response is applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageResult {
    /// Rolled damage before modifiers
    pub base_damage: i32,
    /// Final damage after modifiers
    pub final_damage: i32,
    /// Type of damage dealt
    pub damage_type: DamageType,
    /// Modifier applied
    pub modifier: DamageModifier,
}

impl DamageResult {
    /// Apply a target's response to rolled damage
    pub fn against(target: &dyn Creature, base: i32, dtype: DamageType) -> Self {
        let modifier = target.damage_response(dtype);
        Self {
            base_damage: base,
            final_damage: modifier.apply(base.max(0)),
            damage_type: dtype,
            modifier,
        }
    }

    pub fn effect_tag(&self) -> Option<String> {
        self.modifier.effect_tag(self.damage_type)
    }
}

/// How an effect's dice grow with the power it is used at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaling {
    /// Add dice to the base term for each slot level above the spell's level
    PerSlotLevel {
        #[serde(default = "one")]
        dice_per_level: u32,
    },
    /// Multiply the base dice at character levels 5, 11 and 17 (cantrips)
    CharacterLevel,
}

fn one() -> u32 {
    1
}

/// The levels an effect is being used at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalingContext {
    /// The effect's natural level
    pub base_level: u8,
    /// The level it is actually cast at
    pub slot_level: u8,
    /// Level of the creature using it
    pub caster_level: u8,
}

impl Scaling {
    /// Scale an expression. Only dice counts change; die sizes never do.
    pub fn apply(&self, expression: &DiceExpression, context: ScalingContext) -> DiceExpression {
        match self {
            Scaling::PerSlotLevel { dice_per_level } => {
                let extra_levels = context.slot_level.saturating_sub(context.base_level) as u32;
                expression.with_extra_dice(extra_levels.saturating_mul(*dice_per_level))
            }
            Scaling::CharacterLevel => {
                let tier = match context.caster_level {
                    0..=4 => 1,
                    5..=10 => 2,
                    11..=16 => 3,
                    _ => 4,
                };
                expression.with_dice_multiplier(tier)
            }
        }
    }
}

/// Scale an expression if a rule is present
pub fn scale_expression(
    expression: &DiceExpression,
    scaling: Option<&Scaling>,
    context: ScalingContext,
) -> DiceExpression {
    match scaling {
        Some(rule) => rule.apply(expression, context),
        None => expression.clone(),
    }
}

/// Roll damage for notation plus a flat modifier.
///
/// On a critical hit the dice are doubled; the modifier never is.
pub fn roll_damage(
    dice: &dyn DiceSource,
    notation: &str,
    modifier: i32,
    critical: bool,
) -> Result<RollResult> {
    let expression = DiceExpression::parse(notation)?.plus(modifier);
    Ok(expression.roll(dice, "Damage", critical))
}

/// Roll healing for notation plus a flat modifier
pub fn roll_healing(dice: &dyn DiceSource, notation: &str, modifier: i32) -> Result<RollResult> {
    let expression = DiceExpression::parse(notation)?.plus(modifier);
    Ok(expression.roll(dice, "Healing", false))
}

/// Roll typed damage from an already-scaled expression
pub(crate) fn roll_typed(
    dice: &dyn DiceSource,
    expression: &DiceExpression,
    dtype: DamageType,
    critical: bool,
) -> RollResult {
    expression.roll(dice, &format!("Damage ({})", dtype), critical)
}
