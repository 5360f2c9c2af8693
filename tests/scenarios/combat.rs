//! Combat scenarios
//!
//! Monster attacks against characters, criticals, and damage response

use tabletop_rules::combat::DamageType;
use tabletop_rules::content::ContentLibrary;
use tabletop_rules::RulesError;

use crate::common::{acrobat, brute, builtin, RulesTest};

fn brute_arena(faces: Vec<u32>) -> RulesTest {
    let library = ContentLibrary::from_parts(Vec::new(), vec![brute()]).unwrap();
    RulesTest::with_library(library, faces)
}

/// +6 attack, natural 20 vs AC 14: hit and critical; 2d6+4 becomes 4d6+4
#[test]
fn test_natural_twenty_doubles_damage_dice() {
    let test = brute_arena(vec![20, 3, 3, 3, 3]);
    let result = test
        .engine
        .resolve_monster_action("brute", "Maul", &acrobat(), false, false)
        .unwrap();

    assert!(result.hit);
    assert!(result.critical);
    assert_eq!(result.rolls.len(), 2);

    let attack = &result.rolls[0];
    assert_eq!(attack.total, 26);
    assert!(attack.critical);

    let damage = &result.rolls[1];
    assert_eq!(damage.dice.len(), 4);
    assert_eq!(damage.modifier, 4);
    assert_eq!(damage.total, 16);
    assert!(damage.description.contains("4d6"));
    assert_eq!(result.damage, 16);
    assert_eq!(result.damage_type, Some(DamageType::Bludgeoning));
}

/// Without a critical, the same attack rolls the declared two dice
#[test]
fn test_normal_hit_rolls_declared_dice() {
    let test = brute_arena(vec![10, 3, 3]);
    let result = test
        .engine
        .resolve_monster_action("brute", "maul", &acrobat(), false, false)
        .unwrap();

    assert!(result.hit);
    assert!(!result.critical);
    assert_eq!(result.rolls[1].dice.len(), 2);
    assert_eq!(result.damage, 10);
}

/// 7 + 6 = 13 misses AC 14 and nothing else is rolled
#[test]
fn test_miss() {
    let test = brute_arena(vec![7]);
    let result = test
        .engine
        .resolve_monster_action("brute", "Maul", &acrobat(), false, false)
        .unwrap();

    assert!(!result.hit);
    assert_eq!(result.damage, 0);
    assert_eq!(test.rolled(), 1);
    assert!(result.description.contains("miss"));
}

#[test]
fn test_unknown_monster_and_action() {
    let test = brute_arena(vec![10]);
    assert!(matches!(
        test.engine.resolve_monster_action("dragon", "Bite", &acrobat(), false, false),
        Err(RulesError::UnknownMonster(_))
    ));
    assert!(matches!(
        test.engine.resolve_monster_action("brute", "Bite", &acrobat(), false, false),
        Err(RulesError::UnknownAction { .. })
    ));
}

/// Secondary damage is rolled and listed after the primary roll
#[test]
fn test_additional_damage() {
    let test = RulesTest::with_library(builtin(), vec![12, 4, 5, 6]);
    let result = test
        .engine
        .resolve_monster_action("giant-spider", "Bite", &acrobat(), false, false)
        .unwrap();

    assert!(result.hit);
    assert_eq!(result.rolls.len(), 3);
    // 1d8+3 -> 4 + 3; 2d8 poison -> 5 + 6
    assert_eq!(result.damage, 7 + 11);
}

/// Breath weapon: target saves for half
#[test]
fn test_breath_weapon_save_for_half() {
    // Rogue CON 12 (+1): 18 + 1 = 19 vs DC 14 succeeds; 12d6 all 2 -> 24 -> 12
    let mut faces = vec![18];
    faces.extend([2; 12]);
    let test = RulesTest::with_library(builtin(), faces);
    let result = test
        .engine
        .resolve_monster_action("young-green-dragon", "Poison Breath", &acrobat(), false, false)
        .unwrap();

    assert!(!result.hit);
    assert_eq!(result.damage, 12);
    assert_eq!(result.rolls[1].dice.len(), 12);
}
