//! rules - command-line front end for the tabletop rules engine

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tabletop_rules::rules::Ability;
use tabletop_rules::spellcasting::{casting_warnings, effective_slot_level};
use tabletop_rules::{Character, Config, Creature, Difficulty, Engine, LogFormat, Monster};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Tabletop RPG rules engine
#[derive(Parser, Debug)]
#[command(name = "rules", version, about = "Resolve tabletop RPG rolls, spells and encounters")]
struct Args {
    /// Config file (defaults to rules.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Seed for replayable dice; overrides the config
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Roll dice notation ("2d6+3", "1d8+2d6")
    Roll {
        notation: String,
        #[arg(long, default_value = "")]
        label: String,
    },
    /// Skill check for a character
    Check {
        /// Character snapshot (JSON)
        #[arg(long)]
        character: PathBuf,
        #[arg(long)]
        skill: String,
        #[arg(long)]
        dc: i32,
        #[arg(long)]
        advantage: bool,
        #[arg(long)]
        disadvantage: bool,
    },
    /// Saving throw for a character or a library monster
    Save {
        #[arg(long, conflicts_with = "monster", required_unless_present = "monster")]
        character: Option<PathBuf>,
        #[arg(long)]
        monster: Option<String>,
        #[arg(long)]
        ability: String,
        #[arg(long)]
        dc: i32,
        #[arg(long)]
        advantage: bool,
        #[arg(long)]
        disadvantage: bool,
    },
    /// Resolve a monster action against a character
    Attack {
        #[arg(long)]
        monster: String,
        #[arg(long)]
        action: String,
        /// Target character snapshot (JSON)
        #[arg(long)]
        target: PathBuf,
        #[arg(long)]
        advantage: bool,
        #[arg(long)]
        disadvantage: bool,
    },
    /// Cast a spell
    Cast {
        /// Caster snapshot (JSON)
        #[arg(long)]
        character: PathBuf,
        #[arg(long)]
        spell: String,
        /// Target library monster
        #[arg(long, conflicts_with = "target_character")]
        target_monster: Option<String>,
        /// Target character snapshot (JSON)
        #[arg(long)]
        target_character: Option<PathBuf>,
        /// Slot level to cast at
        #[arg(long)]
        slot: Option<u8>,
    },
    /// Grade an encounter against a party
    Difficulty {
        /// Party levels, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        party: Vec<u8>,
        /// Monster identifiers, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        monsters: Vec<String>,
    },
    /// Generate a random encounter
    Encounter {
        #[arg(long, value_delimiter = ',', required = true)]
        party: Vec<u8>,
        #[arg(long, default_value = "medium")]
        difficulty: Difficulty,
        #[arg(long)]
        environment: Option<String>,
    },
    /// Print a monster stat block
    Statblock { monster: String },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref()).context("loading configuration")?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    // Initialize tracing
    let json_logs = config.log_format == LogFormat::Json;
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .with(json_logs.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .init();

    let engine = Engine::from_config(&config).context("loading content")?;
    run(&engine, args.command, args.json)
}

fn run(engine: &Engine, command: Command, json: bool) -> Result<()> {
    match command {
        Command::Roll { notation, label } => {
            let result = engine.roll_expression(&notation, &label)?;
            emit(json, &result, &result.description)
        }
        Command::Check {
            character,
            skill,
            dc,
            advantage,
            disadvantage,
        } => {
            let character = read_character(&character)?;
            let result = engine.roll_skill_check(&character, &skill, dc, advantage, disadvantage);
            emit(json, &result, &result.description)
        }
        Command::Save {
            character,
            monster,
            ability,
            dc,
            advantage,
            disadvantage,
        } => {
            let ability = parse_ability(&ability)?;
            let creature: Box<dyn Creature> = match (character, monster) {
                (Some(path), _) => Box::new(read_character(&path)?),
                (None, Some(id)) => Box::new(library_monster(engine, &id)?),
                (None, None) => anyhow::bail!("either --character or --monster is required"),
            };
            let result =
                engine.roll_saving_throw(creature.as_ref(), ability, dc, advantage, disadvantage);
            emit(json, &result, &result.description)
        }
        Command::Attack {
            monster,
            action,
            target,
            advantage,
            disadvantage,
        } => {
            let target = read_character(&target)?;
            let result =
                engine.resolve_monster_action(&monster, &action, &target, advantage, disadvantage)?;
            emit(json, &result, &result.description)
        }
        Command::Cast {
            character,
            spell,
            target_monster,
            target_character,
            slot,
        } => {
            let caster = read_character(&character)?;
            let known = engine.library().spell(&spell)?;
            let cast_level = effective_slot_level(known, slot);
            for warning in casting_warnings(&caster, known, cast_level) {
                warn!("{}", warning);
            }
            let target: Option<Box<dyn Creature>> = match (target_monster, target_character) {
                (Some(id), _) => Some(Box::new(library_monster(engine, &id)?)),
                (None, Some(path)) => Some(Box::new(read_character(&path)?)),
                (None, None) => None,
            };
            let result = engine.cast_spell(&caster, &spell, target.as_deref(), slot)?;
            emit(json, &result, &result.description)
        }
        Command::Difficulty { party, monsters } => {
            let evaluation = engine.calculate_encounter_difficulty(&party, &monsters)?;
            let text = format!(
                "{} XP x{} = {} adjusted XP: {} (easy {}, medium {}, hard {}, deadly {})",
                evaluation.total_xp,
                evaluation.multiplier,
                evaluation.adjusted_xp,
                evaluation.difficulty,
                evaluation.thresholds.easy,
                evaluation.thresholds.medium,
                evaluation.thresholds.hard,
                evaluation.thresholds.deadly,
            );
            emit(json, &evaluation, &text)
        }
        Command::Encounter {
            party,
            difficulty,
            environment,
        } => {
            let encounter =
                engine.build_random_encounter(&party, difficulty, environment.as_deref())?;
            let text = format!(
                "{}\n{} ({} adjusted XP)",
                encounter.description, encounter.evaluation.difficulty, encounter.evaluation.adjusted_xp
            );
            emit(json, &encounter, &text)
        }
        Command::Statblock { monster } => {
            let text = engine.monster_stat_block(&monster)?;
            if json {
                let monster = engine.library().monster(&monster)?;
                println!("{}", serde_json::to_string_pretty(monster)?);
            } else {
                println!("{}", text);
            }
            Ok(())
        }
    }
}

fn emit<T: Serialize>(json: bool, value: &T, text: &str) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text);
    }
    Ok(())
}

fn read_character(path: &Path) -> Result<Character> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading character {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing character {}", path.display()))
}

fn library_monster(engine: &Engine, id: &str) -> Result<Monster> {
    Ok(engine.library().monster(id)?.clone())
}

fn parse_ability(name: &str) -> Result<Ability> {
    name.parse::<Ability>()
        .map_err(|_| anyhow::anyhow!("unknown ability: {}", name))
}
