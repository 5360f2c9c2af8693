//! The content library
//!
//! Spells and monsters are loaded once, validated, and then only read. A
//! library is either fully built or not built at all: any unreadable file,
//! parse failure or invariant violation aborts the load.

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::info;

use super::{Monster, Spell};
use crate::error::{Result, RulesError};

const BUILTIN_SPELLS: &str = include_str!("../../data/spells.json");
const BUILTIN_MONSTERS: &str = include_str!("../../data/monsters.json");

/// Immutable spell and monster tables keyed by identifier
#[derive(Debug, Clone, Default)]
pub struct ContentLibrary {
    spells: BTreeMap<String, Spell>,
    monsters: BTreeMap<String, Monster>,
}

impl ContentLibrary {
    /// Library built from the tables shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_SPELLS, BUILTIN_MONSTERS)
    }

    /// Load both tables from files
    pub fn load(spells_path: &Path, monsters_path: &Path) -> Result<Self> {
        Self::from_sources(Some(spells_path), Some(monsters_path))
    }

    /// Load tables from files, using the built-in table for any path not given
    pub fn from_sources(spells_path: Option<&Path>, monsters_path: Option<&Path>) -> Result<Self> {
        let spells_json = match spells_path {
            Some(path) => read_table(path)?,
            None => BUILTIN_SPELLS.to_string(),
        };
        let monsters_json = match monsters_path {
            Some(path) => read_table(path)?,
            None => BUILTIN_MONSTERS.to_string(),
        };
        Self::from_json(&spells_json, &monsters_json)
    }

    /// Parse both tables from JSON objects mapping identifier -> record
    pub fn from_json(spells_json: &str, monsters_json: &str) -> Result<Self> {
        let spells: BTreeMap<String, Spell> = parse_table(spells_json, "spell")?;
        let monsters: BTreeMap<String, Monster> = parse_table(monsters_json, "monster")?;

        Self::from_parts(
            spells.into_iter().map(|(id, mut spell)| {
                spell.id = id;
                spell
            }),
            monsters.into_iter().map(|(id, mut monster)| {
                monster.id = id;
                monster
            }),
        )
    }

    /// Build from records, validating every one
    pub fn from_parts(
        spells: impl IntoIterator<Item = Spell>,
        monsters: impl IntoIterator<Item = Monster>,
    ) -> Result<Self> {
        let mut library = Self::default();

        for spell in spells {
            check_id(&spell.id)?;
            spell.validate()?;
            if library.spells.contains_key(&spell.id) {
                return Err(duplicate(&spell.id));
            }
            library.spells.insert(spell.id.clone(), spell);
        }
        for monster in monsters {
            check_id(&monster.id)?;
            monster.validate()?;
            if library.monsters.contains_key(&monster.id) {
                return Err(duplicate(&monster.id));
            }
            library.monsters.insert(monster.id.clone(), monster);
        }

        info!(
            spells = library.spells.len(),
            monsters = library.monsters.len(),
            "content library loaded"
        );
        Ok(library)
    }

    /// Look up a spell
    pub fn spell(&self, id: &str) -> Result<&Spell> {
        self.spells
            .get(id)
            .ok_or_else(|| RulesError::UnknownSpell(id.to_string()))
    }

    /// Look up a monster
    pub fn monster(&self, id: &str) -> Result<&Monster> {
        self.monsters
            .get(id)
            .ok_or_else(|| RulesError::UnknownMonster(id.to_string()))
    }

    /// All spells in identifier order
    pub fn spells(&self) -> impl Iterator<Item = &Spell> {
        self.spells.values()
    }

    /// All monsters in identifier order
    pub fn monsters(&self) -> impl Iterator<Item = &Monster> {
        self.monsters.values()
    }

    /// Spells a class can cast, lowest level first
    pub fn spells_for_class(&self, class: &str) -> Vec<&Spell> {
        let mut spells: Vec<&Spell> = self.spells().filter(|s| s.available_to(class)).collect();
        spells.sort_by_key(|s| s.level);
        spells
    }

    pub fn spell_count(&self) -> usize {
        self.spells.len()
    }

    pub fn monster_count(&self) -> usize {
        self.monsters.len()
    }
}

fn read_table(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| RulesError::ContentRead {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_table<T: DeserializeOwned>(json: &str, table: &'static str) -> Result<BTreeMap<String, T>> {
    serde_json::from_str(json).map_err(|source| RulesError::ContentParse { table, source })
}

fn check_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(RulesError::InvalidContent {
            id: id.to_string(),
            reason: "identifier must not be empty".to_string(),
        });
    }
    Ok(())
}

fn duplicate(id: &str) -> RulesError {
    RulesError::InvalidContent {
        id: id.to_string(),
        reason: "duplicate identifier".to_string(),
    }
}
