//! tabletop-rules - tabletop RPG rules engine
//!
//! Turns character and monster snapshots plus a declared action into
//! rules-consistent outcomes: checks, saves, attacks, damage and healing,
//! spellcasting, and encounter grading and generation against a content
//! library of spells and monsters.

pub mod character;
pub mod combat;
pub mod config;
pub mod content;
pub mod dice;
pub mod encounter;
pub mod error;
pub mod rules;
pub mod spellcasting;
pub mod statblock;

use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

pub use character::Character;
pub use config::{Config, LogFormat};
pub use content::{ContentLibrary, Monster, Spell};
pub use dice::{Advantage, DiceSource, RollResult, ScriptedDice, SeededDice, ThreadRngDice};
pub use encounter::{Difficulty, EncounterEvaluation, GeneratedEncounter};
pub use error::{Result, RulesError};
pub use rules::Creature;
pub use spellcasting::{SpellCastResult, SpellOutcome};

use combat::AttackResult;

/// The rules engine: a loaded content library plus a dice source.
///
/// Every operation reads the library and rolls through the dice source;
/// nothing else is retained between calls. The engine is `Send + Sync` and
/// can be shared behind an `Arc`.
pub struct Engine {
    library: Arc<ContentLibrary>,
    dice: Arc<dyn DiceSource>,
    encounter_rng: Mutex<StdRng>,
}

impl Engine {
    /// Create an engine from a loaded library and a dice source
    pub fn new(library: ContentLibrary, dice: Arc<dyn DiceSource>) -> Self {
        Self {
            library: Arc::new(library),
            dice,
            encounter_rng: Mutex::new(StdRng::from_rng(&mut rand::rng())),
        }
    }

    /// Create an engine whose dice and encounter picks replay from a seed
    pub fn seeded(library: ContentLibrary, seed: u64) -> Self {
        Self {
            library: Arc::new(library),
            dice: Arc::new(SeededDice::new(seed)),
            encounter_rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Load content and pick the dice source described by a config
    pub fn from_config(config: &Config) -> Result<Self> {
        let library = ContentLibrary::from_sources(
            config.spells_path.as_deref(),
            config.monsters_path.as_deref(),
        )?;
        let engine = match config.seed {
            Some(seed) => {
                info!(seed, "using seeded dice");
                Self::seeded(library, seed)
            }
            None => Self::new(library, Arc::new(ThreadRngDice)),
        };
        Ok(engine)
    }

    pub fn library(&self) -> &ContentLibrary {
        &self.library
    }

    pub fn dice(&self) -> &dyn DiceSource {
        self.dice.as_ref()
    }

    /// Roll a dice pool; see [`dice::roll`]
    pub fn roll(
        &self,
        sides: u32,
        count: u32,
        modifier: i32,
        advantage: bool,
        disadvantage: bool,
    ) -> Result<RollResult> {
        dice::roll(self.dice(), sides, count, modifier, advantage, disadvantage)
    }

    /// Roll arbitrary notation ("2d6+1d4+3")
    pub fn roll_expression(&self, notation: &str, label: &str) -> Result<RollResult> {
        dice::roll_expression(self.dice(), notation, label)
    }

    pub fn roll_damage(&self, notation: &str, modifier: i32, critical: bool) -> Result<RollResult> {
        combat::roll_damage(self.dice(), notation, modifier, critical)
    }

    pub fn roll_healing(&self, notation: &str, modifier: i32) -> Result<RollResult> {
        combat::roll_healing(self.dice(), notation, modifier)
    }

    pub fn roll_skill_check(
        &self,
        creature: &dyn Creature,
        skill: &str,
        dc: i32,
        advantage: bool,
        disadvantage: bool,
    ) -> RollResult {
        combat::roll_skill_check(
            self.dice(),
            creature,
            skill,
            dc,
            Advantage::from_flags(advantage, disadvantage),
        )
    }

    pub fn roll_ability_check(
        &self,
        creature: &dyn Creature,
        ability: rules::Ability,
        dc: i32,
        advantage: bool,
        disadvantage: bool,
    ) -> RollResult {
        combat::roll_ability_check(
            self.dice(),
            creature,
            ability,
            dc,
            Advantage::from_flags(advantage, disadvantage),
        )
    }

    pub fn roll_saving_throw(
        &self,
        creature: &dyn Creature,
        ability: rules::Ability,
        dc: i32,
        advantage: bool,
        disadvantage: bool,
    ) -> RollResult {
        combat::roll_saving_throw(
            self.dice(),
            creature,
            ability,
            dc,
            Advantage::from_flags(advantage, disadvantage),
        )
    }

    pub fn roll_initiative(&self, creature: &dyn Creature) -> RollResult {
        combat::roll_initiative(self.dice(), creature, Advantage::Normal)
    }

    pub fn roll_attack(
        &self,
        attacker: &dyn Creature,
        target: &dyn Creature,
        attack_bonus: i32,
        advantage: bool,
        disadvantage: bool,
    ) -> RollResult {
        combat::roll_attack(
            self.dice(),
            attacker,
            target,
            attack_bonus,
            Advantage::from_flags(advantage, disadvantage),
        )
    }

    /// Resolve a library monster's named action against a target
    pub fn resolve_monster_action(
        &self,
        monster_id: &str,
        action: &str,
        target: &dyn Creature,
        advantage: bool,
        disadvantage: bool,
    ) -> Result<AttackResult> {
        let monster = self.library.monster(monster_id)?;
        combat::resolve_monster_action(
            self.dice(),
            monster,
            action,
            target,
            Advantage::from_flags(advantage, disadvantage),
        )
    }

    /// Cast a library spell; see [`spellcasting::cast_spell`]
    pub fn cast_spell(
        &self,
        caster: &Character,
        spell_id: &str,
        target: Option<&dyn Creature>,
        slot_level: Option<u8>,
    ) -> Result<SpellCastResult> {
        spellcasting::cast_spell(&self.library, self.dice(), caster, spell_id, target, slot_level)
    }

    pub fn calculate_encounter_difficulty<S: AsRef<str>>(
        &self,
        party_levels: &[u8],
        monster_ids: &[S],
    ) -> Result<EncounterEvaluation> {
        encounter::calculate_encounter_difficulty(&self.library, party_levels, monster_ids)
    }

    pub fn build_random_encounter(
        &self,
        party_levels: &[u8],
        target: Difficulty,
        environment: Option<&str>,
    ) -> Result<GeneratedEncounter> {
        let mut rng = self.encounter_rng.lock();
        encounter::build_random_encounter(&self.library, party_levels, target, environment, &mut *rng)
    }

    /// Stat block text for a library monster
    pub fn monster_stat_block(&self, monster_id: &str) -> Result<String> {
        let monster = self.library.monster(monster_id)?;
        Ok(statblock::generate_monster_stat_block(monster))
    }
}
