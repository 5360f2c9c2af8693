//! Dice expressions
//!
//! Parses and rolls notation like "2d6+3", "1d8 + 2d6", "d20-1". An
//! expression is one or more dice terms plus a flat modifier.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{
    join_faces, signed, total_of, DiceSource, RollResult, MAX_DICE_PER_TERM, MAX_DIE_SIDES,
};
use crate::error::{Result, RulesError};

/// Whole-expression shape: terms joined by + or -
static EXPRESSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d*d\d+|\d+)(?:[+-](?:\d*d\d+|\d+))*$").unwrap()
});

/// A single signed term: dice ("2d6", "d8") or a flat number ("3")
static TERM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([+-])?(?:(\d*)d(\d+)|(\d+))").unwrap());

/// `count` dice with `sides` sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceTerm {
    pub count: u32,
    pub sides: u32,
}

impl fmt::Display for DiceTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}

/// A parsed dice expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceExpression {
    /// Dice terms in the order written; the first is the base term
    pub terms: Vec<DiceTerm>,
    /// Sum of all flat terms
    pub modifier: i32,
}

impl DiceExpression {
    /// Create a single-term expression
    pub fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self {
            terms: vec![DiceTerm { count, sides }],
            modifier,
        }
    }

    /// Parse dice notation
    pub fn parse(notation: &str) -> Result<Self> {
        let invalid = |reason: &str| RulesError::InvalidDiceExpression {
            expression: notation.to_string(),
            reason: reason.to_string(),
        };

        let compact: String = notation
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();

        if compact.is_empty() {
            return Err(invalid("empty expression"));
        }
        if !EXPRESSION_REGEX.is_match(&compact) {
            return Err(invalid("expected terms like 2d6, d8 or 3 joined by + or -"));
        }

        let mut terms = Vec::new();
        let mut modifier: i32 = 0;

        for caps in TERM_REGEX.captures_iter(&compact) {
            let negative = caps.get(1).is_some_and(|m| m.as_str() == "-");

            if let Some(sides) = caps.get(3) {
                if negative {
                    return Err(invalid("subtracted dice terms are not supported"));
                }
                let count_str = caps.get(2).map_or("", |m| m.as_str());
                let count: u32 = if count_str.is_empty() {
                    1 // "d6" means "1d6"
                } else {
                    count_str
                        .parse()
                        .map_err(|_| invalid("dice count out of range"))?
                };
                let sides: u32 = sides
                    .as_str()
                    .parse()
                    .map_err(|_| invalid("die sides out of range"))?;

                if count == 0 {
                    return Err(invalid("dice count must be at least 1"));
                }
                if count > MAX_DICE_PER_TERM {
                    return Err(invalid("too many dice in one term"));
                }
                if sides < 2 {
                    return Err(invalid("die sides must be at least 2"));
                }
                if sides > MAX_DIE_SIDES {
                    return Err(invalid("die sides out of range"));
                }
                terms.push(DiceTerm { count, sides });
            } else if let Some(flat) = caps.get(4) {
                let value: i32 = flat
                    .as_str()
                    .parse()
                    .map_err(|_| invalid("modifier out of range"))?;
                modifier = if negative {
                    modifier.saturating_sub(value)
                } else {
                    modifier.saturating_add(value)
                };
            }
        }

        if terms.is_empty() {
            return Err(invalid("expression has no dice"));
        }

        Ok(Self { terms, modifier })
    }

    /// Total number of dice across all terms
    pub fn dice_count(&self) -> u32 {
        self.terms.iter().fold(0, |acc, t| acc.saturating_add(t.count))
    }

    /// Same expression with every dice count doubled and the modifier unchanged
    pub fn doubled(&self) -> Self {
        Self {
            terms: self
                .terms
                .iter()
                .map(|t| DiceTerm {
                    count: t.count.saturating_mul(2),
                    sides: t.sides,
                })
                .collect(),
            modifier: self.modifier,
        }
    }

    /// Add dice to the base term, keeping its die size
    pub fn with_extra_dice(&self, extra: u32) -> Self {
        let mut scaled = self.clone();
        if let Some(base) = scaled.terms.first_mut() {
            base.count = base.count.saturating_add(extra);
        }
        scaled
    }

    /// Multiply the base term's dice count, keeping its die size
    pub fn with_dice_multiplier(&self, factor: u32) -> Self {
        let mut scaled = self.clone();
        if let Some(base) = scaled.terms.first_mut() {
            base.count = base.count.saturating_mul(factor.max(1));
        }
        scaled
    }

    /// Same dice with an additional flat modifier
    pub fn plus(&self, modifier: i32) -> Self {
        Self {
            terms: self.terms.clone(),
            modifier: self.modifier.saturating_add(modifier),
        }
    }

    /// Get the minimum possible result
    pub fn min(&self) -> i32 {
        saturate(i64::from(self.dice_count()) + i64::from(self.modifier))
    }

    /// Get the maximum possible result
    pub fn max(&self) -> i32 {
        let dice = self.terms.iter().fold(0i64, |acc, t| {
            acc.saturating_add(i64::from(t.count).saturating_mul(i64::from(t.sides)))
        });
        saturate(dice.saturating_add(i64::from(self.modifier)))
    }

    /// Get the expected average (rounded down)
    pub fn average(&self) -> i32 {
        let dice: f64 = self
            .terms
            .iter()
            .map(|t| t.count as f64 * (1.0 + t.sides as f64) / 2.0)
            .sum();
        (dice + self.modifier as f64).floor() as i32
    }

    /// Roll the expression.
    ///
    /// On a critical hit every dice count is doubled; the flat modifier is
    /// never doubled.
    pub fn roll(&self, dice: &dyn DiceSource, label: &str, critical: bool) -> RollResult {
        let effective = if critical { self.doubled() } else { self.clone() };

        let mut all_faces = Vec::with_capacity(effective.dice_count() as usize);
        let mut segments = Vec::with_capacity(effective.terms.len());

        for term in &effective.terms {
            let faces: Vec<u32> = (0..term.count).map(|_| dice.roll_die(term.sides)).collect();
            segments.push(format!("{} [{}]", term, join_faces(&faces)));
            all_faces.extend(faces);
        }

        let total = total_of(&all_faces, effective.modifier);

        let mut description = segments.join(" + ");
        if effective.modifier != 0 {
            description.push(' ');
            description.push_str(&signed(effective.modifier));
        }
        description.push_str(&format!(" = {}", total));
        if critical {
            description.push_str(" (critical)");
        }
        if !label.is_empty() {
            description = format!("{}: {}", label, description);
        }

        RollResult {
            total,
            dice: all_faces.clone(),
            kept: all_faces,
            modifier: effective.modifier,
            advantage: false,
            disadvantage: false,
            critical,
            success: None,
            description,
        }
    }
}

impl FromStr for DiceExpression {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms: Vec<String> = self.terms.iter().map(|t| t.to_string()).collect();
        write!(f, "{}", terms.join("+"))?;
        if self.modifier != 0 {
            write!(f, "{}", signed(self.modifier))?;
        }
        Ok(())
    }
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Parse and roll arbitrary notation
pub fn roll_expression(dice: &dyn DiceSource, notation: &str, label: &str) -> Result<RollResult> {
    Ok(DiceExpression::parse(notation)?.roll(dice, label, false))
}
