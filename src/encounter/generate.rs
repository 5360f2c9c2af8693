//! Random encounter generation
//!
//! Picks one to three monsters from a challenge rating band around the
//! party's average level, optionally limited to creature types that fit an
//! environment, and keeps the pick that best matches the requested
//! difficulty.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Difficulty, EncounterEvaluation};
use crate::content::{ContentLibrary, Monster};
use crate::error::{Result, RulesError};

/// Picks tried before settling for the closest match
const MAX_ATTEMPTS: usize = 10;

/// Largest group a single pick produces
const MAX_GROUP: usize = 3;

/// Where an encounter takes place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Forest,
    Dungeon,
    Mountain,
    Swamp,
    Desert,
    Urban,
    Underdark,
    Coastal,
    Arctic,
    Grassland,
}

impl Environment {
    pub fn all() -> &'static [Environment] {
        &[
            Environment::Forest,
            Environment::Dungeon,
            Environment::Mountain,
            Environment::Swamp,
            Environment::Desert,
            Environment::Urban,
            Environment::Underdark,
            Environment::Coastal,
            Environment::Arctic,
            Environment::Grassland,
        ]
    }

    /// Creature types found in this environment
    pub fn creature_types(&self) -> &'static [&'static str] {
        match self {
            Environment::Forest => &["beast", "fey", "humanoid", "monstrosity", "plant"],
            Environment::Dungeon => &["aberration", "construct", "humanoid", "monstrosity", "ooze", "undead"],
            Environment::Mountain => &["beast", "dragon", "elemental", "giant", "humanoid", "monstrosity"],
            Environment::Swamp => &["beast", "humanoid", "monstrosity", "plant", "undead", "dragon"],
            Environment::Desert => &["beast", "elemental", "humanoid", "monstrosity", "undead"],
            Environment::Urban => &["construct", "fiend", "humanoid", "undead"],
            Environment::Underdark => &["aberration", "humanoid", "monstrosity", "ooze", "undead"],
            Environment::Coastal => &["beast", "elemental", "humanoid", "monstrosity"],
            Environment::Arctic => &["beast", "elemental", "giant", "humanoid", "monstrosity"],
            Environment::Grassland => &["beast", "giant", "humanoid", "monstrosity"],
        }
    }

    /// Whether a monster belongs here
    pub fn allows(&self, monster: &Monster) -> bool {
        self.creature_types()
            .iter()
            .any(|t| t.eq_ignore_ascii_case(monster.creature_type.trim()))
    }

    fn scene(&self) -> &'static str {
        match self {
            Environment::Forest => "Beneath the dense canopy",
            Environment::Dungeon => "In the torchlit corridors",
            Environment::Mountain => "On a wind-scoured ridge",
            Environment::Swamp => "Among the reeking bogs",
            Environment::Desert => "Across the shimmering dunes",
            Environment::Urban => "In the narrow city streets",
            Environment::Underdark => "Deep in the lightless caverns",
            Environment::Coastal => "Along the storm-lashed shore",
            Environment::Arctic => "Out on the frozen wastes",
            Environment::Grassland => "Across the open plains",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Environment::Forest => "forest",
            Environment::Dungeon => "dungeon",
            Environment::Mountain => "mountain",
            Environment::Swamp => "swamp",
            Environment::Desert => "desert",
            Environment::Urban => "urban",
            Environment::Underdark => "underdark",
            Environment::Coastal => "coastal",
            Environment::Arctic => "arctic",
            Environment::Grassland => "grassland",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Environment::all()
            .iter()
            .copied()
            .find(|e| e.to_string() == wanted)
            .ok_or_else(|| format!("unknown environment: {}", s))
    }
}

/// A generated encounter and its grade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedEncounter {
    pub monster_ids: Vec<String>,
    pub monster_names: Vec<String>,
    pub evaluation: EncounterEvaluation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
    pub description: String,
}

/// Build a random encounter for a party.
///
/// Unknown environment tags are ignored with a warning. If no monster fits
/// both the CR band and the environment, the environment is dropped, then
/// the band; only an empty library is an error.
pub fn build_random_encounter<R: Rng + ?Sized>(
    library: &ContentLibrary,
    party_levels: &[u8],
    target: Difficulty,
    environment: Option<&str>,
    rng: &mut R,
) -> Result<GeneratedEncounter> {
    let environment = environment.and_then(|tag| match tag.parse::<Environment>() {
        Ok(env) => Some(env),
        Err(err) => {
            warn!(%err, "ignoring environment filter");
            None
        }
    });

    let levels: Vec<u8> = if party_levels.is_empty() {
        warn!("empty party; generating for a single level 1 character");
        vec![1]
    } else {
        party_levels.iter().map(|l| (*l).clamp(1, 20)).collect()
    };
    let average = levels.iter().map(|&l| l as f64).sum::<f64>() / levels.len() as f64;
    let min_cr = average / 4.0;
    let max_cr = (average + 2.0).max(1.0);
    let in_band = |m: &&Monster| {
        let cr = m.challenge_rating.value();
        cr >= min_cr && cr <= max_cr
    };

    let mut pool: Vec<&Monster> = library
        .monsters()
        .filter(in_band)
        .filter(|m| environment.map_or(true, |env| env.allows(m)))
        .collect();
    if pool.is_empty() && environment.is_some() {
        warn!("no monsters fit the environment and CR band; dropping the environment");
        pool = library.monsters().filter(in_band).collect();
    }
    if pool.is_empty() {
        warn!(min_cr, max_cr, "no monsters in the CR band; using the whole library");
        pool = library.monsters().collect();
    }
    if pool.is_empty() {
        return Err(RulesError::EmptyCandidatePool);
    }

    let mut best: Option<(f64, Vec<&Monster>, EncounterEvaluation)> = None;
    for attempt in 0..MAX_ATTEMPTS {
        let count = rng.random_range(1..=MAX_GROUP);
        let picked: Vec<&Monster> = (0..count)
            .map(|_| pool[rng.random_range(0..pool.len())])
            .collect();
        let xp: Vec<u32> = picked.iter().map(|m| m.xp()).collect();
        let evaluation = EncounterEvaluation::from_xp(&levels, &xp);

        if evaluation.difficulty == target {
            debug!(attempt, "encounter matched target difficulty");
            best = Some((0.0, picked, evaluation));
            break;
        }

        let distance = (evaluation.adjusted_xp - target.anchor(&evaluation.thresholds)).abs();
        if best.as_ref().map_or(true, |(d, _, _)| distance < *d) {
            best = Some((distance, picked, evaluation));
        }
    }

    let (_, picked, evaluation) = best.ok_or(RulesError::EmptyCandidatePool)?;
    let monster_names: Vec<String> = picked.iter().map(|m| m.name.clone()).collect();
    let description = describe(environment, &monster_names);

    debug!(%description, difficulty = %evaluation.difficulty, "encounter generated");

    Ok(GeneratedEncounter {
        monster_ids: picked.iter().map(|m| m.id.clone()).collect(),
        monster_names,
        evaluation,
        environment,
        description,
    })
}

/// Flavor text from the scene phrase and the size of the group
fn describe(environment: Option<Environment>, names: &[String]) -> String {
    let scene = environment.map_or("Ahead on the road", |e| e.scene());
    let group = match names {
        [] => "all is quiet".to_string(),
        [one] => format!("a lone {} blocks the way", one.to_lowercase()),
        [first, second] => format!(
            "{} and {} lie in wait",
            with_article(first),
            with_article(second)
        ),
        [rest @ .., last] => format!(
            "{} and {} close in from all sides",
            rest.iter().map(|n| with_article(n)).collect::<Vec<_>>().join(", "),
            with_article(last)
        ),
    };
    format!("{}, {}.", scene, group)
}

/// "a goblin", "an orc"
fn with_article(name: &str) -> String {
    let name = name.to_lowercase();
    let article = match name.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    };
    format!("{} {}", article, name)
}
