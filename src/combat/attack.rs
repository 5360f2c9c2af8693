//! Attack resolution
//!
//! Rolls to hit, then rolls every damage term of the attack and applies the
//! target's resistances, immunities and vulnerabilities per term.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::check::{roll_attack, roll_saving_throw};
use super::damage::{roll_typed, DamageResult, DamageType};
use crate::content::{ActionDamage, Monster};
use crate::dice::{Advantage, DiceExpression, DiceSource, RollResult};
use crate::error::{Result, RulesError};
use crate::rules::Creature;

/// Result of an attack or damaging action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackResult {
    /// Whether the attack hit (for save-based actions: whether the target failed)
    pub hit: bool,
    /// Natural 20 on the attack roll
    pub critical: bool,
    /// Damage dealt after the target's damage response
    pub damage: i32,
    /// Primary damage type, if the attack deals damage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage_type: Option<DamageType>,
    /// Narrative tags such as "resisted:fire"
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<String>,
    /// Every roll that contributed, in order: attack or save, base damage, secondary damage
    pub rolls: Vec<RollResult>,
    pub description: String,
}

/// Rolled damage terms after the target's response
struct DamageOutcome {
    amount: i32,
    effects: Vec<String>,
    rolls: Vec<RollResult>,
    summary: Vec<String>,
}

/// Roll an action's damage block (plus any `additional` term) against a target
fn roll_damage_block(
    dice: &dyn DiceSource,
    target: &dyn Creature,
    damage: &ActionDamage,
    critical: bool,
    halve: bool,
) -> Result<DamageOutcome> {
    let mut terms = vec![(DiceExpression::parse(&damage.dice)?, damage.damage_type)];
    if let Some(additional) = &damage.additional {
        terms.push((DiceExpression::parse(&additional.dice)?, additional.damage_type));
    }

    let mut outcome = DamageOutcome {
        amount: 0,
        effects: Vec::new(),
        rolls: Vec::new(),
        summary: Vec::new(),
    };

    let rolls: Vec<(RollResult, DamageType)> = terms
        .into_iter()
        .map(|(expression, dtype)| (roll_typed(dice, &expression, dtype, critical), dtype))
        .collect();

    let mut amounts: Vec<i32> = rolls.iter().map(|(roll, _)| roll.total.max(0)).collect();
    if halve {
        // Halve the combined total once; the rounding remainder stays with the first term
        let halved_total = amounts.iter().sum::<i32>() / 2;
        for amount in amounts.iter_mut() {
            *amount /= 2;
        }
        let leftover = halved_total - amounts.iter().sum::<i32>();
        if let Some(first) = amounts.first_mut() {
            *first += leftover;
        }
    }

    for ((roll, dtype), rolled) in rolls.into_iter().zip(amounts) {
        let result = DamageResult::against(target, rolled, dtype);
        if let Some(tag) = result.effect_tag() {
            outcome.effects.push(tag);
        }
        outcome.amount += result.final_damage;
        outcome.summary.push(format!("{} {}", result.final_damage, dtype));
        outcome.rolls.push(roll);
    }

    Ok(outcome)
}

/// Resolve an attack: roll to hit, then damage on a hit.
///
/// A hit is a total that meets or beats the target's armor class. On a
/// critical hit every damage term rolls twice its dice; modifiers are not
/// doubled.
pub fn resolve_attack(
    dice: &dyn DiceSource,
    attacker: &dyn Creature,
    target: &dyn Creature,
    attack_bonus: i32,
    damage: Option<&ActionDamage>,
    advantage: Advantage,
) -> Result<AttackResult> {
    let attack = roll_attack(dice, attacker, target, attack_bonus, advantage);
    let hit = attack.success == Some(true);
    let critical = attack.critical;

    let mut result = AttackResult {
        hit,
        critical,
        damage: 0,
        damage_type: damage.map(|d| d.damage_type),
        effects: Vec::new(),
        rolls: Vec::new(),
        description: attack.description.clone(),
    };
    result.rolls.push(attack);

    if let (true, Some(damage)) = (hit, damage) {
        let outcome = roll_damage_block(dice, target, damage, critical, false)?;
        result.apply(outcome);
    }

    debug!(description = %result.description, "attack resolved");
    Ok(result)
}

/// Resolve a monster's named action against a target.
///
/// Attack actions roll to hit. Save actions have the target roll against the
/// action's DC; a success negates the damage or halves it (rounded down).
/// Actions with neither deal their damage unconditionally.
pub fn resolve_monster_action(
    dice: &dyn DiceSource,
    monster: &Monster,
    action_name: &str,
    target: &dyn Creature,
    advantage: Advantage,
) -> Result<AttackResult> {
    let action = monster
        .action(action_name)
        .ok_or_else(|| RulesError::UnknownAction {
            monster: monster.id.clone(),
            action: action_name.to_string(),
        })?;

    if let Some(bonus) = action.attack_bonus {
        return resolve_attack(dice, monster, target, bonus, action.damage.as_ref(), advantage);
    }

    let mut result = AttackResult {
        hit: true,
        critical: false,
        damage: 0,
        damage_type: action.damage.as_ref().map(|d| d.damage_type),
        effects: Vec::new(),
        rolls: Vec::new(),
        description: format!("{} uses {} on {}", monster.name, action.name, target.name()),
    };

    let mut halve = false;
    if let Some(save) = &action.save {
        let roll = roll_saving_throw(dice, target, save.ability, save.dc, Advantage::Normal);
        let saved = roll.success == Some(true);
        result.hit = !saved;
        halve = saved && save.half_on_success;
        result.description = format!("{}. {}", result.description, roll.description);
        result.rolls.push(roll);
    }

    if let Some(damage) = &action.damage {
        if result.hit || halve {
            let outcome = roll_damage_block(dice, target, damage, false, halve)?;
            result.apply(outcome);
        }
    }

    debug!(description = %result.description, "monster action resolved");
    Ok(result)
}

impl AttackResult {
    fn apply(&mut self, outcome: DamageOutcome) {
        self.damage += outcome.amount;
        self.effects.extend(outcome.effects);
        for roll in &outcome.rolls {
            self.description.push_str(". ");
            self.description.push_str(&roll.description);
        }
        self.rolls.extend(outcome.rolls);
        self.description
            .push_str(&format!(". Total: {} damage", outcome.summary.join(" + ")));
        if !self.effects.is_empty() {
            self.description
                .push_str(&format!(" ({})", self.effects.join(", ")));
        }
    }
}
