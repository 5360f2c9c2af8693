//! Check and saving throw scenarios

use tabletop_rules::rules::Ability;

use crate::common::{acrobat, brute, healer, RulesTest};

/// DEX 14 at level 5, proficient: +5. A natural 10 meets DC 15.
#[test]
fn test_acrobatics_natural_ten_succeeds() {
    let test = RulesTest::scripted(vec![10]);
    let result = test
        .engine
        .roll_skill_check(&acrobat(), "Acrobatics", 15, false, false);

    assert_eq!(result.modifier, 5);
    assert_eq!(result.total, 15);
    assert_eq!(result.success, Some(true));
    assert!(!result.critical);
    assert!(result.description.contains("Acrobatics"));
}

/// Same check, natural 9: 14 misses DC 15
#[test]
fn test_acrobatics_natural_nine_fails() {
    let test = RulesTest::scripted(vec![9]);
    let result = test
        .engine
        .roll_skill_check(&acrobat(), "acrobatics", 15, false, false);

    assert_eq!(result.modifier, 5);
    assert_eq!(result.total, 14);
    assert_eq!(result.success, Some(false));
}

/// Both flags set: one die, no advantage or disadvantage
#[test]
fn test_both_flags_fall_back_to_normal() {
    let test = RulesTest::scripted(vec![4, 18]);
    let result = test
        .engine
        .roll_skill_check(&acrobat(), "Acrobatics", 10, true, true);

    assert_eq!(test.rolled(), 1);
    assert_eq!(result.dice, vec![4]);
    assert!(!result.advantage && !result.disadvantage);
}

/// The description lists the discarded die too
#[test]
fn test_disadvantage_trace() {
    let test = RulesTest::scripted(vec![17, 3]);
    let result = test
        .engine
        .roll_skill_check(&acrobat(), "Acrobatics", 10, false, true);

    assert_eq!(result.kept, vec![3]);
    assert_eq!(result.total, 8);
    assert!(result.description.contains("[17, 3]"));
    assert!(result.description.contains("(disadvantage)"));
}

/// Character save proficiency adds the proficiency bonus
#[test]
fn test_character_save() {
    let test = RulesTest::scripted(vec![10]);
    // WIS 16 (+3), proficient at level 3 (+2)
    let result = test
        .engine
        .roll_saving_throw(&healer(), Ability::Wisdom, 15, false, false);
    assert_eq!(result.modifier, 5);
    assert_eq!(result.success, Some(true));
}

/// A monster with no declared save bonus uses its raw modifier
#[test]
fn test_monster_save_without_declaration() {
    let test = RulesTest::scripted(vec![10]);
    let result = test
        .engine
        .roll_saving_throw(&brute(), Ability::Strength, 15, false, false);
    assert_eq!(result.modifier, 4);
    assert_eq!(result.total, 14);
    assert_eq!(result.success, Some(false));
}

/// Declared monster save bonuses are used as printed
#[test]
fn test_monster_declared_save() {
    let test = RulesTest::scripted(vec![10]);
    let captain = test.engine.library().monster("bandit-captain").unwrap().clone();
    let result = test
        .engine
        .roll_saving_throw(&captain, Ability::Dexterity, 15, false, false);
    assert_eq!(result.modifier, 5);
    assert_eq!(result.success, Some(true));
}

/// Unknown skills fall back to Wisdom rather than failing
#[test]
fn test_unknown_skill() {
    let test = RulesTest::scripted(vec![10]);
    let result = test
        .engine
        .roll_skill_check(&healer(), "Basket Weaving", 12, false, false);
    assert_eq!(result.modifier, 3);
    assert_eq!(result.success, Some(true));
}

#[test]
fn test_initiative_has_no_target() {
    let test = RulesTest::scripted(vec![11]);
    let result = test.engine.roll_initiative(&acrobat());
    assert_eq!(result.total, 13);
    assert_eq!(result.success, None);
}
