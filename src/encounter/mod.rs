//! Encounter balancing
//!
//! Party XP thresholds per character level, the monster-count multiplier,
//! and classification of a group of monsters against a party.

mod generate;

use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::content::ContentLibrary;
use crate::error::Result;

pub use generate::{build_random_encounter, Environment, GeneratedEncounter};

/// Easy/medium/hard/deadly XP per character, levels 1-20
const LEVEL_THRESHOLDS: [[u32; 4]; 20] = [
    [25, 50, 75, 100],
    [50, 100, 150, 200],
    [75, 150, 225, 400],
    [125, 250, 375, 500],
    [250, 500, 750, 1100],
    [300, 600, 900, 1400],
    [350, 750, 1100, 1700],
    [450, 900, 1400, 2100],
    [550, 1100, 1600, 2400],
    [600, 1200, 1900, 2800],
    [800, 1600, 2400, 3600],
    [1000, 2000, 3000, 4500],
    [1100, 2200, 3400, 5100],
    [1250, 2500, 3800, 5700],
    [1400, 2800, 4300, 6400],
    [1600, 3200, 4800, 7200],
    [2000, 3900, 5900, 8800],
    [2100, 4200, 6300, 9500],
    [2400, 4900, 7300, 10900],
    [2800, 5700, 8500, 12700],
];

/// XP thresholds for one character, or summed across a party
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EncounterDifficulty {
    pub easy: u32,
    pub medium: u32,
    pub hard: u32,
    pub deadly: u32,
}

impl EncounterDifficulty {
    /// Thresholds for a character level; out-of-range levels are clamped to 1-20
    pub fn for_level(level: u8) -> Self {
        let clamped = level.clamp(1, 20);
        if clamped != level {
            warn!(level, clamped, "character level out of range for encounter thresholds");
        }
        let [easy, medium, hard, deadly] = LEVEL_THRESHOLDS[(clamped - 1) as usize];
        Self {
            easy,
            medium,
            hard,
            deadly,
        }
    }

    /// Summed thresholds for a party
    pub fn for_party(levels: &[u8]) -> Self {
        levels.iter().map(|&level| Self::for_level(level)).sum()
    }
}

impl Add for EncounterDifficulty {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            easy: self.easy + other.easy,
            medium: self.medium + other.medium,
            hard: self.hard + other.hard,
            deadly: self.deadly + other.deadly,
        }
    }
}

impl Sum for EncounterDifficulty {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Difficulty classification of an encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Trivial,
    Easy,
    Medium,
    Hard,
    Deadly,
    Impossible,
}

impl Difficulty {
    pub fn all() -> &'static [Difficulty] {
        &[
            Difficulty::Trivial,
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Deadly,
            Difficulty::Impossible,
        ]
    }

    /// Adjusted XP this classification is centered on for a party
    pub(crate) fn anchor(&self, thresholds: &EncounterDifficulty) -> f64 {
        let easy = thresholds.easy as f64;
        let medium = thresholds.medium as f64;
        let hard = thresholds.hard as f64;
        let deadly = thresholds.deadly as f64;
        match self {
            Difficulty::Trivial => easy / 4.0,
            Difficulty::Easy => (easy / 2.0 + medium) / 2.0,
            Difficulty::Medium => (medium + hard) / 2.0,
            Difficulty::Hard => (hard + deadly) / 2.0,
            Difficulty::Deadly => (deadly + 2.0 * deadly) / 2.0,
            Difficulty::Impossible => deadly * 2.5,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Trivial => "trivial",
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Deadly => "deadly",
            Difficulty::Impossible => "impossible",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trivial" => Ok(Difficulty::Trivial),
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "deadly" => Ok(Difficulty::Deadly),
            "impossible" => Ok(Difficulty::Impossible),
            _ => Err(format!("unknown difficulty: {}", s)),
        }
    }
}

/// XP multiplier for the number of monsters in an encounter
pub fn encounter_multiplier(monster_count: usize) -> f64 {
    match monster_count {
        0 | 1 => 1.0,
        2 => 1.5,
        3..=6 => 2.0,
        7..=10 => 2.5,
        11..=14 => 3.0,
        _ => 4.0,
    }
}

/// Classify adjusted XP against party thresholds.
///
/// Boundaries: below half of easy is trivial; up to medium is easy; up to
/// hard is medium; up to deadly is hard; below twice deadly is deadly.
pub fn classify(adjusted_xp: f64, thresholds: &EncounterDifficulty) -> Difficulty {
    if adjusted_xp < thresholds.easy as f64 / 2.0 {
        Difficulty::Trivial
    } else if adjusted_xp <= thresholds.medium as f64 {
        Difficulty::Easy
    } else if adjusted_xp <= thresholds.hard as f64 {
        Difficulty::Medium
    } else if adjusted_xp <= thresholds.deadly as f64 {
        Difficulty::Hard
    } else if adjusted_xp < thresholds.deadly as f64 * 2.0 {
        Difficulty::Deadly
    } else {
        Difficulty::Impossible
    }
}

/// An encounter graded against a party
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterEvaluation {
    /// Party thresholds
    pub thresholds: EncounterDifficulty,
    /// Raw monster XP
    pub total_xp: u32,
    /// Raw XP times the monster-count multiplier
    pub adjusted_xp: f64,
    pub multiplier: f64,
    pub monster_count: usize,
    pub difficulty: Difficulty,
}

impl EncounterEvaluation {
    /// Grade raw monster XP values against a party
    pub fn from_xp(party_levels: &[u8], monster_xp: &[u32]) -> Self {
        let thresholds = EncounterDifficulty::for_party(party_levels);
        let total_xp: u32 = monster_xp.iter().sum();
        let multiplier = encounter_multiplier(monster_xp.len());
        let adjusted_xp = total_xp as f64 * multiplier;
        Self {
            thresholds,
            total_xp,
            adjusted_xp,
            multiplier,
            monster_count: monster_xp.len(),
            difficulty: classify(adjusted_xp, &thresholds),
        }
    }
}

/// Grade a group of library monsters against a party.
///
/// Fails if any monster identifier is unknown.
pub fn calculate_encounter_difficulty<S: AsRef<str>>(
    library: &ContentLibrary,
    party_levels: &[u8],
    monster_ids: &[S],
) -> Result<EncounterEvaluation> {
    let monster_xp = monster_ids
        .iter()
        .map(|id| library.monster(id.as_ref()).map(|m| m.xp()))
        .collect::<Result<Vec<_>>>()?;

    let evaluation = EncounterEvaluation::from_xp(party_levels, &monster_xp);
    debug!(
        total_xp = evaluation.total_xp,
        adjusted_xp = evaluation.adjusted_xp,
        difficulty = %evaluation.difficulty,
        "encounter evaluated"
    );
    Ok(evaluation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RulesError;

    #[test]
    fn test_party_thresholds() {
        let party = EncounterDifficulty::for_party(&[3, 3, 3, 3]);
        assert_eq!(
            party,
            EncounterDifficulty {
                easy: 300,
                medium: 600,
                hard: 900,
                deadly: 1600
            }
        );
    }

    #[test]
    fn test_levels_clamped() {
        assert_eq!(EncounterDifficulty::for_level(25), EncounterDifficulty::for_level(20));
        assert_eq!(EncounterDifficulty::for_level(0), EncounterDifficulty::for_level(1));
    }

    #[test]
    fn test_multiplier_table() {
        assert_eq!(encounter_multiplier(1), 1.0);
        assert_eq!(encounter_multiplier(2), 1.5);
        assert_eq!(encounter_multiplier(3), 2.0);
        assert_eq!(encounter_multiplier(6), 2.0);
        assert_eq!(encounter_multiplier(7), 2.5);
        assert_eq!(encounter_multiplier(10), 2.5);
        assert_eq!(encounter_multiplier(11), 3.0);
        assert_eq!(encounter_multiplier(14), 3.0);
        assert_eq!(encounter_multiplier(15), 4.0);
        assert_eq!(encounter_multiplier(40), 4.0);
    }

    #[test]
    fn test_classification_boundaries() {
        let t = EncounterDifficulty {
            easy: 300,
            medium: 600,
            hard: 900,
            deadly: 1600,
        };
        assert_eq!(classify(149.0, &t), Difficulty::Trivial);
        assert_eq!(classify(150.0, &t), Difficulty::Easy);
        assert_eq!(classify(600.0, &t), Difficulty::Easy);
        assert_eq!(classify(601.0, &t), Difficulty::Medium);
        // Exactly hard is still medium; exactly deadly is still hard
        assert_eq!(classify(900.0, &t), Difficulty::Medium);
        assert_eq!(classify(1600.0, &t), Difficulty::Hard);
        assert_eq!(classify(1601.0, &t), Difficulty::Deadly);
        assert_eq!(classify(3199.0, &t), Difficulty::Deadly);
        assert_eq!(classify(3200.0, &t), Difficulty::Impossible);
    }

    #[test]
    fn test_two_monsters_are_one_and_a_half() {
        let evaluation = EncounterEvaluation::from_xp(&[1], &[25, 50]);
        assert_eq!(evaluation.total_xp, 75);
        assert_eq!(evaluation.adjusted_xp, 112.5);
    }

    #[test]
    fn test_library_encounter() {
        let library = ContentLibrary::builtin().unwrap();
        let evaluation = calculate_encounter_difficulty(&library, &[3, 3, 3, 3], &["ettin"]).unwrap();
        assert_eq!(evaluation.total_xp, 1100);
        assert_eq!(evaluation.multiplier, 1.0);
        assert_eq!(evaluation.difficulty, Difficulty::Hard);

        let err = calculate_encounter_difficulty(&library, &[3], &["ettin", "nothing"]).unwrap_err();
        assert!(matches!(err, RulesError::UnknownMonster(id) if id == "nothing"));
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!("Deadly".parse::<Difficulty>().unwrap(), Difficulty::Deadly);
        assert!("brutal".parse::<Difficulty>().is_err());
        for d in Difficulty::all() {
            assert_eq!(d.to_string().parse::<Difficulty>().unwrap(), *d);
        }
    }

    #[test]
    fn test_anchors_classify_as_themselves() {
        let t = EncounterDifficulty::for_party(&[5, 5, 5, 5]);
        for d in Difficulty::all() {
            assert_eq!(classify(d.anchor(&t), &t), *d, "{} anchor", d);
        }
    }
}
