//! Stat block rendering
//!
//! Output only: the text is meant for display or for narration context and
//! is never parsed back.

use std::fmt::Write;

use crate::content::{ActionDamage, Monster, MonsterAction, MonsterTrait};
use crate::dice::{signed, DiceExpression};
use crate::rules::{ability_modifier, Ability, Skill};

/// Render a monster as a conventional stat block.
///
/// Sections for empty lists (resistances, legendary actions, ...) are
/// omitted.
pub fn generate_monster_stat_block(monster: &Monster) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", monster.name);
    let mut kind = format!("{} {}", monster.size, monster.creature_type);
    if let Some(subtype) = &monster.subtype {
        let _ = write!(kind, " ({})", subtype);
    }
    if let Some(alignment) = &monster.alignment {
        let _ = write!(kind, ", {}", alignment);
    }
    let _ = writeln!(out, "{}", kind);
    out.push('\n');

    match &monster.armor_desc {
        Some(desc) => {
            let _ = writeln!(out, "Armor Class {} ({})", monster.armor_class, desc);
        }
        None => {
            let _ = writeln!(out, "Armor Class {}", monster.armor_class);
        }
    }
    match &monster.hit_dice {
        Some(dice) => {
            let _ = writeln!(out, "Hit Points {} ({})", monster.hit_points, dice);
        }
        None => {
            let _ = writeln!(out, "Hit Points {}", monster.hit_points);
        }
    }
    let _ = writeln!(out, "Speed {}", format_speed(monster));
    out.push('\n');

    let header: Vec<String> = Ability::all()
        .iter()
        .map(|a| format!("{:<9}", a.abbreviation()))
        .collect();
    let scores: Vec<String> = Ability::all()
        .iter()
        .map(|a| {
            let score = monster.abilities.get(*a);
            format!("{:<9}", format!("{} ({})", score, signed(ability_modifier(score))))
        })
        .collect();
    let _ = writeln!(out, "{}", header.concat().trim_end());
    let _ = writeln!(out, "{}", scores.concat().trim_end());
    out.push('\n');

    if !monster.saving_throws.is_empty() {
        let saves: Vec<String> = monster
            .saving_throws
            .iter()
            .map(|(ability, bonus)| format!("{} {}", title_case(ability.abbreviation()), signed(*bonus)))
            .collect();
        let _ = writeln!(out, "Saving Throws {}", saves.join(", "));
    }
    if !monster.skills.is_empty() {
        let skills: Vec<String> = monster
            .skills
            .iter()
            .map(|(name, bonus)| {
                let name = name
                    .parse::<Skill>()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|_| title_case(name));
                format!("{} {}", name, signed(*bonus))
            })
            .collect();
        let _ = writeln!(out, "Skills {}", skills.join(", "));
    }
    list_line(&mut out, "Damage Vulnerabilities", &monster.damage_vulnerabilities);
    list_line(&mut out, "Damage Resistances", &monster.damage_resistances);
    list_line(&mut out, "Damage Immunities", &monster.damage_immunities);
    list_line(&mut out, "Condition Immunities", &monster.condition_immunities);
    list_line(&mut out, "Senses", &monster.senses);
    list_line(&mut out, "Languages", &monster.languages);
    let _ = writeln!(
        out,
        "Challenge {} ({} XP)    Proficiency Bonus {}",
        monster.challenge_rating,
        format_xp(monster.xp()),
        signed(monster.proficiency_bonus)
    );

    if !monster.special_abilities.is_empty() {
        out.push('\n');
        for feature in &monster.special_abilities {
            trait_line(&mut out, feature);
        }
    }
    action_section(&mut out, "Actions", &monster.actions);
    action_section(&mut out, "Legendary Actions", &monster.legendary_actions);

    out.trim_end().to_string()
}

/// "30 ft., fly 60 ft."; walking speed first
fn format_speed(monster: &Monster) -> String {
    let mut parts = Vec::new();
    if let Some(walk) = monster.speed.get("walk") {
        parts.push(format!("{} ft.", walk));
    }
    for (mode, feet) in &monster.speed {
        if mode != "walk" {
            parts.push(format!("{} {} ft.", mode, feet));
        }
    }
    if parts.is_empty() {
        "0 ft.".to_string()
    } else {
        parts.join(", ")
    }
}

/// Thousands separators ("1,100")
fn format_xp(xp: u32) -> String {
    let digits = xp.to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn title_case(s: &str) -> String {
    let lower = s.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn list_line(out: &mut String, label: &str, items: &[String]) {
    if !items.is_empty() {
        let _ = writeln!(out, "{} {}", label, items.join(", "));
    }
}

fn trait_line(out: &mut String, feature: &MonsterTrait) {
    let _ = writeln!(out, "{}. {}", feature.name, feature.description);
}

fn action_section(out: &mut String, title: &str, actions: &[MonsterAction]) {
    if actions.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{}", title);
    for action in actions {
        let mut line = format!("{}. {}", action.name, action.description);
        if action.save.is_none() {
            if let Some(damage) = &action.damage {
                let _ = write!(line, " Hit: {}", damage_text(damage));
            }
        }
        let _ = writeln!(out, "{}", line);
    }
}

/// "5 (1d6+2) slashing damage plus 9 (2d8) poison damage."
fn damage_text(damage: &ActionDamage) -> String {
    let mut text = format!("{} damage", average_text(&damage.dice, &damage.damage_type.to_string()));
    if let Some(additional) = &damage.additional {
        let _ = write!(
            text,
            " plus {} damage",
            average_text(&additional.dice, &additional.damage_type.to_string())
        );
    }
    text.push('.');
    text
}

fn average_text(dice: &str, damage_type: &str) -> String {
    match DiceExpression::parse(dice) {
        Ok(expression) => format!("{} ({}) {}", expression.average().max(1), expression, damage_type),
        Err(_) => format!("{} {}", dice, damage_type),
    }
}
