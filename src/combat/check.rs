//! Checks, saving throws and attack rolls
//!
//! Thin wrappers over a single d20 roll: every total is the natural die plus
//! one documented modifier, compared against a DC or armor class.

use tracing::debug;

use crate::dice::{roll_d20, Advantage, DiceSource, RollResult};
use crate::rules::{Ability, Creature, Skill};

/// Roll a skill check: d20 + ability modifier + skill proficiency vs DC
pub fn roll_skill_check(
    dice: &dyn DiceSource,
    creature: &dyn Creature,
    skill: &str,
    dc: i32,
    advantage: Advantage,
) -> RollResult {
    let modifier = creature.skill_modifier(skill);
    let skill_name = skill
        .parse::<Skill>()
        .map(|s| s.to_string())
        .unwrap_or_else(|_| skill.trim().to_string());

    let result = roll_d20(dice, modifier, advantage).against(
        &format!("{} {} check", creature.name(), skill_name),
        "DC",
        dc,
    );
    debug!(description = %result.description, "skill check");
    result
}

/// Roll a raw ability check: d20 + ability modifier vs DC
pub fn roll_ability_check(
    dice: &dyn DiceSource,
    creature: &dyn Creature,
    ability: Ability,
    dc: i32,
    advantage: Advantage,
) -> RollResult {
    let modifier = creature.ability_modifier(ability);
    let result = roll_d20(dice, modifier, advantage).against(
        &format!("{} {} check", creature.name(), ability),
        "DC",
        dc,
    );
    debug!(description = %result.description, "ability check");
    result
}

/// Roll a saving throw: d20 + ability modifier + save proficiency vs DC
pub fn roll_saving_throw(
    dice: &dyn DiceSource,
    creature: &dyn Creature,
    ability: Ability,
    dc: i32,
    advantage: Advantage,
) -> RollResult {
    let modifier = creature.save_modifier(ability);
    let result = roll_d20(dice, modifier, advantage).against(
        &format!("{} {} save", creature.name(), ability),
        "DC",
        dc,
    );
    debug!(description = %result.description, "saving throw");
    result
}

/// Roll initiative: a Dexterity check with no DC
pub fn roll_initiative(
    dice: &dyn DiceSource,
    creature: &dyn Creature,
    advantage: Advantage,
) -> RollResult {
    let modifier = creature.ability_modifier(Ability::Dexterity);
    let mut result = roll_d20(dice, modifier, advantage);
    result.description = format!("{} initiative: {}", creature.name(), result.description);
    result
}

/// Roll an attack: d20 + attack bonus vs the target's armor class.
///
/// `success` on the result is the hit; `critical` comes straight from the
/// retained die.
pub fn roll_attack(
    dice: &dyn DiceSource,
    attacker: &dyn Creature,
    target: &dyn Creature,
    attack_bonus: i32,
    advantage: Advantage,
) -> RollResult {
    let result = roll_d20(dice, attack_bonus, advantage).against_with(
        &format!("{} attacks {}", attacker.name(), target.name()),
        "AC",
        target.armor_class(),
        ["hit", "miss"],
    );
    debug!(description = %result.description, "attack roll");
    result
}
