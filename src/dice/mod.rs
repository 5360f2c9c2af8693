//! Dice rolling system
//!
//! Rolls plain dice pools ("3d6+2"), d20 tests with advantage or
//! disadvantage, and multi-term damage expressions ("2d6+1d4+3"). Every
//! result carries a trace of each individual die so the outcome can be
//! audited and dropped straight into narration.

mod expr;
mod source;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, RulesError};

pub use expr::{DiceExpression, DiceTerm, roll_expression};
pub use source::{DiceSource, ScriptedDice, SeededDice, ThreadRngDice};

/// Largest dice count accepted in a single pool or expression term
pub const MAX_DICE_PER_TERM: u32 = 1000;

/// Largest die size accepted
pub const MAX_DIE_SIDES: u32 = 1000;

/// Whether a d20 test rolls one die, or two keeping the higher/lower
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Advantage {
    #[default]
    Normal,
    Advantage,
    Disadvantage,
}

impl Advantage {
    /// Combine caller flags.
    ///
    /// Passing both flags is caller misuse; the roll falls back to a plain
    /// roll instead of failing.
    pub fn from_flags(advantage: bool, disadvantage: bool) -> Self {
        match (advantage, disadvantage) {
            (true, true) => {
                warn!("both advantage and disadvantage requested; rolling normally");
                Advantage::Normal
            }
            (true, false) => Advantage::Advantage,
            (false, true) => Advantage::Disadvantage,
            (false, false) => Advantage::Normal,
        }
    }

    pub fn is_advantage(&self) -> bool {
        matches!(self, Advantage::Advantage)
    }

    pub fn is_disadvantage(&self) -> bool {
        matches!(self, Advantage::Disadvantage)
    }
}

/// Outcome of a roll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// Retained dice plus modifier
    pub total: i32,
    /// Every die rolled, including any discarded by advantage/disadvantage
    pub dice: Vec<u32>,
    /// Dice that count toward the total
    pub kept: Vec<u32>,
    /// Flat modifier applied
    pub modifier: i32,
    pub advantage: bool,
    pub disadvantage: bool,
    /// Natural 20 on a retained d20 (or a doubled-dice damage roll)
    pub critical: bool,
    /// Set only when the roll was evaluated against a DC or armor class
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    /// Human-readable trace of the roll
    pub description: String,
}

impl RollResult {
    /// The first retained die, i.e. the natural result of a d20 test
    pub fn natural(&self) -> Option<u32> {
        self.kept.first().copied()
    }

    /// Evaluate against a target number (meet or beat), labelling the trace
    pub(crate) fn against(self, label: &str, target_name: &str, target: i32) -> Self {
        self.against_with(label, target_name, target, ["success", "failure"])
    }

    /// Like [`against`](Self::against) with custom outcome words
    pub(crate) fn against_with(
        mut self,
        label: &str,
        target_name: &str,
        target: i32,
        outcomes: [&str; 2],
    ) -> Self {
        let success = self.total >= target;
        self.success = Some(success);
        self.description = format!(
            "{}: {} vs {} {}: {}",
            label,
            self.description,
            target_name,
            target,
            if success { outcomes[0] } else { outcomes[1] }
        );
        self
    }
}

/// Format a modifier with an explicit sign ("+3", "-1", "+0")
pub fn signed(modifier: i32) -> String {
    format!("{:+}", modifier)
}

/// Sum faces plus a modifier, saturating at the `i32` range
pub(crate) fn total_of(faces: &[u32], modifier: i32) -> i32 {
    let sum: i64 = faces.iter().map(|&f| i64::from(f)).sum::<i64>() + i64::from(modifier);
    sum.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

pub(crate) fn join_faces(faces: &[u32]) -> String {
    faces
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Roll `count` dice with `sides` sides plus a modifier.
///
/// With advantage or disadvantage, `count` is ignored: exactly two dice are
/// rolled and the higher (or lower) one is kept. Passing both flags rolls
/// normally.
pub fn roll(
    dice: &dyn DiceSource,
    sides: u32,
    count: u32,
    modifier: i32,
    advantage: bool,
    disadvantage: bool,
) -> Result<RollResult> {
    roll_with(dice, sides, count, modifier, Advantage::from_flags(advantage, disadvantage))
}

/// Roll with an already-resolved [`Advantage`] mode
pub fn roll_with(
    dice: &dyn DiceSource,
    sides: u32,
    count: u32,
    modifier: i32,
    mode: Advantage,
) -> Result<RollResult> {
    if !(2..=MAX_DIE_SIDES).contains(&sides) || !(1..=MAX_DICE_PER_TERM).contains(&count) {
        return Err(RulesError::InvalidDice { count, sides });
    }
    Ok(roll_pool(dice, sides, count, modifier, mode))
}

/// Roll a single d20 test
pub fn roll_d20(dice: &dyn DiceSource, modifier: i32, mode: Advantage) -> RollResult {
    roll_pool(dice, 20, 1, modifier, mode)
}

fn roll_pool(
    dice: &dyn DiceSource,
    sides: u32,
    count: u32,
    modifier: i32,
    mode: Advantage,
) -> RollResult {
    let (rolled, kept) = match mode {
        Advantage::Normal => {
            let rolled: Vec<u32> = (0..count).map(|_| dice.roll_die(sides)).collect();
            (rolled.clone(), rolled)
        }
        Advantage::Advantage | Advantage::Disadvantage => {
            let first = dice.roll_die(sides);
            let second = dice.roll_die(sides);
            let keep = if mode.is_advantage() {
                first.max(second)
            } else {
                first.min(second)
            };
            (vec![first, second], vec![keep])
        }
    };

    let total = total_of(&kept, modifier);
    let critical = sides == 20 && kept.contains(&20);

    let mut description = match mode {
        Advantage::Normal => format!(
            "{}d{} [{}] {} = {}",
            count,
            sides,
            join_faces(&rolled),
            signed(modifier),
            total
        ),
        _ => format!(
            "2d{} [{}] keep {} {} = {}",
            sides,
            join_faces(&rolled),
            kept[0],
            signed(modifier),
            total
        ),
    };
    if mode.is_advantage() {
        description.push_str(" (advantage)");
    } else if mode.is_disadvantage() {
        description.push_str(" (disadvantage)");
    }
    if critical {
        description.push_str(" CRITICAL");
    }

    debug!(%description, "rolled dice");

    RollResult {
        total,
        dice: rolled,
        kept,
        modifier,
        advantage: mode.is_advantage(),
        disadvantage: mode.is_disadvantage(),
        critical,
        success: None,
        description,
    }
}
