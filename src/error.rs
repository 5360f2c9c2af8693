//! Engine error taxonomy
//!
//! Lookup failures and content-authoring defects are reported as errors.
//! Caller misuse (both advantage flags, unknown skill names) is not: those
//! inputs fall back to a documented default and log a warning instead.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the rules engine
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("unknown spell: {0}")]
    UnknownSpell(String),

    #[error("unknown monster: {0}")]
    UnknownMonster(String),

    #[error("monster '{monster}' has no action named '{action}'")]
    UnknownAction { monster: String, action: String },

    #[error("invalid dice expression '{expression}': {reason}")]
    InvalidDiceExpression { expression: String, reason: String },

    #[error("invalid dice: {count}d{sides} (need 1 to 1000 dice with 2 to 1000 sides)")]
    InvalidDice { count: u32, sides: u32 },

    #[error("spell '{spell}' is missing its {block} block")]
    MissingEffectBlock { spell: String, block: &'static str },

    #[error("failed to read content file {}: {source}", path.display())]
    ContentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {table} table: {source}")]
    ContentParse {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid content '{id}': {reason}")]
    InvalidContent { id: String, reason: String },

    #[error("no monsters available to build an encounter")]
    EmptyCandidatePool,

    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),
}

/// Result alias used throughout the engine
pub type Result<T> = std::result::Result<T, RulesError>;
