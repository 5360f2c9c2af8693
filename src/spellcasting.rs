//! Spellcasting resolution
//!
//! Dispatches on a spell's automation kind. Slot consumption is not tracked
//! here: the caller decides whether the caster may cast at the requested
//! level.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::character::Character;
use crate::combat::{roll_saving_throw, roll_typed, scale_expression, DamageResult, DamageType, ScalingContext};
use crate::content::{ContentLibrary, HealingModifier, Spell, SpellAutomation};
use crate::dice::{Advantage, DiceExpression, DiceSource, RollResult};
use crate::error::Result;
use crate::rules::{spell_save_dc, Ability, Creature};

/// Highest spell slot level
pub const MAX_SLOT_LEVEL: u8 = 9;

/// A target's saving throw against a spell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOutcome {
    pub ability: Ability,
    pub dc: i32,
    pub succeeded: bool,
}

/// Mechanical effect of a cast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpellOutcome {
    Damage {
        amount: i32,
        damage_type: DamageType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        save: Option<SaveOutcome>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        effects: Vec<String>,
    },
    Healing {
        amount: i32,
    },
    /// Resolved by the narrative layer
    Narrative,
}

/// Result of casting a spell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellCastResult {
    pub spell_id: String,
    pub spell_name: String,
    pub spell_level: u8,
    /// Level actually cast at (0 for cantrips)
    pub slot_level: u8,
    pub automation: SpellAutomation,
    pub outcome: SpellOutcome,
    /// Save roll (if any) followed by the damage or healing roll
    pub rolls: Vec<RollResult>,
    pub description: String,
}

/// Slot level a spell is actually cast at.
///
/// Cantrips ignore the slot. Otherwise the natural level is the default and
/// the floor; 9 is the ceiling.
pub fn effective_slot_level(spell: &Spell, requested: Option<u8>) -> u8 {
    if spell.is_cantrip() {
        return 0;
    }
    requested
        .unwrap_or(spell.level)
        .clamp(spell.level, MAX_SLOT_LEVEL)
}

/// Problems with a caster's snapshot for this cast: an unknown spell or no
/// slot left at the cast level.
///
/// Slots are not consumed here; the caller decides whether to go ahead.
pub fn casting_warnings(caster: &Character, spell: &Spell, slot_level: u8) -> Vec<String> {
    let mut warnings = Vec::new();
    if !caster.knows_spell(&spell.id) {
        warnings.push(format!("{} does not know {}", caster.name, spell.name));
    }
    if slot_level > 0 && caster.slots_at(slot_level) == 0 {
        warnings.push(format!(
            "{} has no level {} slot for {}",
            caster.name, slot_level, spell.name
        ));
    }
    warnings
}

/// Cast a spell from the library.
///
/// Fails only if the spell is unknown or its data is malformed.
pub fn cast_spell(
    library: &ContentLibrary,
    dice: &dyn DiceSource,
    caster: &Character,
    spell_id: &str,
    target: Option<&dyn Creature>,
    slot_level: Option<u8>,
) -> Result<SpellCastResult> {
    let spell = library.spell(spell_id)?;
    let slot = effective_slot_level(spell, slot_level);
    let context = ScalingContext {
        base_level: spell.level,
        slot_level: slot,
        caster_level: caster.level,
    };

    let mut description = match target {
        Some(target) => format!("{} casts {} on {}", caster.name, spell.name, target.name()),
        None => format!("{} casts {}", caster.name, spell.name),
    };
    if !spell.is_cantrip() {
        description.push_str(&format!(" at level {}", slot));
    }

    let mut rolls = Vec::new();

    let outcome = match spell.automation {
        SpellAutomation::DamageSave | SpellAutomation::AutoHit => {
            let block = spell.damage_block()?;
            let expression = DiceExpression::parse(&block.dice)?.plus(block.modifier);
            let expression = scale_expression(&expression, block.scaling.as_ref(), context);

            let save = match (spell.automation, target, spell.saving_throw) {
                (SpellAutomation::DamageSave, Some(target), Some(ability)) => {
                    let dc = spell_save_dc(caster);
                    let roll = roll_saving_throw(dice, target, ability, dc, Advantage::Normal);
                    let succeeded = roll.success == Some(true);
                    description.push_str(&format!(". {}", roll.description));
                    rolls.push(roll);
                    Some(SaveOutcome {
                        ability,
                        dc,
                        succeeded,
                    })
                }
                _ => None,
            };

            let negated = save.is_some_and(|s| s.succeeded) && !block.half_on_save;
            let mut amount = 0;
            let mut effects = Vec::new();

            if !negated {
                let roll = roll_typed(dice, &expression, block.damage_type, false);
                amount = roll.total.max(0);
                if save.is_some_and(|s| s.succeeded) {
                    amount /= 2;
                }
                description.push_str(&format!(". {}", roll.description));
                rolls.push(roll);

                if let Some(target) = target {
                    let result = DamageResult::against(target, amount, block.damage_type);
                    effects.extend(result.effect_tag());
                    amount = result.final_damage;
                }
            }

            description.push_str(&format!(". {} {} damage", amount, block.damage_type));
            if !effects.is_empty() {
                description.push_str(&format!(" ({})", effects.join(", ")));
            }

            SpellOutcome::Damage {
                amount,
                damage_type: block.damage_type,
                save,
                effects,
            }
        }
        SpellAutomation::Healing => {
            let block = spell.healing_block()?;
            let modifier = match block.modifier {
                HealingModifier::SpellcastingAbility => caster.spellcasting_modifier(),
                HealingModifier::None => 0,
            };
            let expression = DiceExpression::parse(&block.dice)?.plus(modifier);
            let expression = scale_expression(&expression, block.scaling.as_ref(), context);

            let roll = expression.roll(dice, "Healing", false);
            let amount = roll.total.max(0);
            description.push_str(&format!(". {}", roll.description));
            rolls.push(roll);

            SpellOutcome::Healing { amount }
        }
        SpellAutomation::Narrative => SpellOutcome::Narrative,
    };

    debug!(spell = %spell.id, %description, "spell cast");

    Ok(SpellCastResult {
        spell_id: spell.id.clone(),
        spell_name: spell.name.clone(),
        spell_level: spell.level,
        slot_level: slot,
        automation: spell.automation,
        outcome,
        rolls,
        description,
    })
}
