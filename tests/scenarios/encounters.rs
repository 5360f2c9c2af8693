//! Encounter grading and generation scenarios

use tabletop_rules::{Difficulty, Engine};

use crate::common::{builtin, RulesTest};

/// Four level-3 characters against one CR 4 monster
#[test]
fn test_single_cr4_monster_against_level_three_party() {
    let test = RulesTest::scripted(vec![1]);
    let party = [3, 3, 3, 3];

    let first = test
        .engine
        .calculate_encounter_difficulty(&party, &["ettin"])
        .unwrap();

    assert_eq!(first.total_xp, 1100);
    assert_eq!(first.multiplier, 1.0);
    assert_eq!(first.adjusted_xp, 1100.0);
    assert_eq!(first.thresholds.easy, 300);
    assert_eq!(first.thresholds.medium, 600);
    assert_eq!(first.thresholds.hard, 900);
    assert_eq!(first.thresholds.deadly, 1600);
    assert_eq!(first.difficulty, Difficulty::Hard);

    for _ in 0..10 {
        let again = test
            .engine
            .calculate_encounter_difficulty(&party, &["ettin"])
            .unwrap();
        assert_eq!(again, first);
    }
}

/// Two monsters: adjusted XP is exactly 1.5x raw
#[test]
fn test_pair_multiplier() {
    let test = RulesTest::scripted(vec![1]);
    let evaluation = test
        .engine
        .calculate_encounter_difficulty(&[2, 2], &["orc", "orc"])
        .unwrap();
    assert_eq!(evaluation.total_xp, 200);
    assert_eq!(evaluation.adjusted_xp, 300.0);
    assert_eq!(evaluation.monster_count, 2);
}

/// A horde of goblins
#[test]
fn test_large_group_multiplier() {
    let test = RulesTest::scripted(vec![1]);
    let goblins = vec!["goblin"; 8];
    let evaluation = test
        .engine
        .calculate_encounter_difficulty(&[1, 1, 1, 1], &goblins)
        .unwrap();
    assert_eq!(evaluation.total_xp, 400);
    assert_eq!(evaluation.adjusted_xp, 1000.0);
    assert_eq!(evaluation.difficulty, Difficulty::Impossible);
}

#[test]
fn test_generated_encounter_is_graded() {
    let engine = Engine::seeded(builtin(), 77);
    for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
        let encounter = engine
            .build_random_encounter(&[3, 3, 3, 3], difficulty, Some("dungeon"))
            .unwrap();
        assert!((1..=3).contains(&encounter.monster_ids.len()));
        let regraded = engine
            .calculate_encounter_difficulty(&[3, 3, 3, 3], &encounter.monster_ids)
            .unwrap();
        assert_eq!(regraded, encounter.evaluation);
        assert!(!encounter.description.is_empty());
    }
}
