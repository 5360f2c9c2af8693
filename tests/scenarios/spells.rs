//! Spellcasting scenarios

use tabletop_rules::combat::DamageType;
use tabletop_rules::{Engine, RulesError, SpellOutcome};

use crate::common::{builtin, evoker, healer, RulesTest};

fn damage_roll_dice(engine: &Engine, slot: u8) -> (usize, String) {
    let goblin = engine.library().monster("goblin").unwrap().clone();
    let result = engine
        .cast_spell(&evoker(), "fireball", Some(&goblin), Some(slot))
        .unwrap();
    let damage = result.rolls.last().unwrap();
    assert!(damage.dice.iter().all(|d| (1..=6).contains(d)));
    (damage.dice.len(), damage.description.clone())
}

/// Upcasting by two levels adds exactly two dice of the same size
#[test]
fn test_upcast_adds_dice_not_size() {
    let base = Engine::seeded(builtin(), 1234);
    let upcast = Engine::seeded(builtin(), 1234);

    let (base_count, base_text) = damage_roll_dice(&base, 3);
    let (upcast_count, upcast_text) = damage_roll_dice(&upcast, 5);

    assert_eq!(base_count, 8);
    assert_eq!(upcast_count, base_count + 2);
    assert!(base_text.contains("8d6"));
    assert!(upcast_text.contains("10d6"));
}

/// DC 15 against the goblin's +2 Dexterity save
#[test]
fn test_fireball_against_goblin() {
    let mut faces = vec![12];
    faces.extend([4; 8]);
    let test = RulesTest::scripted(faces);
    let goblin = test.engine.library().monster("goblin").unwrap().clone();
    let result = test
        .engine
        .cast_spell(&evoker(), "fireball", Some(&goblin), None)
        .unwrap();

    assert_eq!(result.slot_level, 3);
    match result.outcome {
        SpellOutcome::Damage {
            amount,
            damage_type,
            save,
            ..
        } => {
            let save = save.unwrap();
            assert_eq!(save.dc, 15);
            // 12 + 2 = 14 fails; 8d6 of 4s
            assert!(!save.succeeded);
            assert_eq!(amount, 32);
            assert_eq!(damage_type, DamageType::Fire);
        }
        other => panic!("expected damage, got {:?}", other),
    }
}

/// Healing adds the spellcasting modifier once
#[test]
fn test_healing_word() {
    let test = RulesTest::scripted(vec![4]);
    let result = test
        .engine
        .cast_spell(&healer(), "healing-word", None, None)
        .unwrap();
    assert_eq!(result.outcome, SpellOutcome::Healing { amount: 7 });
}

/// Narrative spells succeed and roll nothing
#[test]
fn test_hold_person_is_narrative() {
    let test = RulesTest::scripted(vec![20]);
    let result = test
        .engine
        .cast_spell(&healer(), "hold-person", None, None)
        .unwrap();
    assert_eq!(result.outcome, SpellOutcome::Narrative);
    assert_eq!(result.spell_name, "Hold Person");
    assert_eq!(result.slot_level, 2);
    assert_eq!(test.rolled(), 0);
}

#[test]
fn test_unknown_spell_is_an_error() {
    let test = RulesTest::scripted(vec![1]);
    assert!(matches!(
        test.engine.cast_spell(&evoker(), "wish", None, None),
        Err(RulesError::UnknownSpell(id)) if id == "wish"
    ));
}

/// Results serialize for the narrative layer
#[test]
fn test_cast_result_json() {
    let test = RulesTest::scripted(vec![3]);
    let result = test
        .engine
        .cast_spell(&evoker(), "magic-missile", None, Some(2))
        .unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["outcome"]["kind"], "damage");
    assert_eq!(json["outcome"]["damage_type"], "force");
    assert_eq!(json["automation"], "auto_hit");
    // 4d4 of 3s + 3
    assert_eq!(json["outcome"]["amount"], 15);
}
