//! Combat resolution
//!
//! - Skill checks, ability checks, saving throws and initiative
//! - Attack rolls against armor class
//! - Damage and healing with critical doubling and level scaling
//! - Damage types with immunity, resistance and vulnerability
//! - Monster action resolution

mod attack;
mod check;
mod damage;

pub use attack::{resolve_attack, resolve_monster_action, AttackResult};
pub use check::{
    roll_ability_check, roll_attack, roll_initiative, roll_saving_throw, roll_skill_check,
};
pub use damage::{
    roll_damage, roll_healing, scale_expression, DamageModifier, DamageProfile, DamageResult,
    DamageType, Scaling, ScalingContext,
};
pub(crate) use damage::roll_typed;
