use chrono::{DateTime, TimeZone, Utc};
use idiomaster_core::{
    day_of_year, eligible_idioms, infer_level, level_progress, todays_idiom, Catalog, Idiom,
    Level, ProgressState, A1_GOAL, A2_GOAL, B1_GOAL, B2_GOAL, C1_GOAL, FREE_LEVELS,
};
use std::collections::HashSet;

fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
}

// Enough idioms per tier to clear every gate.
fn graded_catalog() -> Catalog {
    let mut idioms = Vec::new();
    let sizes = [
        (Level::A1, 4),
        (Level::A2, 6),
        (Level::B1, 9),
        (Level::B2, 11),
        (Level::C1, 6),
        (Level::C2, 3),
    ];
    for (level, count) in sizes {
        for i in 0..count {
            idioms.push(Idiom::new(
                format!("{level}-{i}"),
                format!("{level} idiom {i}"),
                "意味",
                level,
            ));
        }
    }
    Catalog::new(idioms).unwrap()
}

fn learn(learned: &mut HashSet<String>, level: Level, n: usize) {
    for i in 0..n {
        learned.insert(format!("{level}-{i}"));
    }
}

#[test]
fn level_gates_are_sequential() {
    let catalog = graded_catalog();
    let mut learned = HashSet::new();
    assert_eq!(infer_level(&learned, &catalog), Level::A1);

    learn(&mut learned, Level::A1, A1_GOAL);
    assert_eq!(infer_level(&learned, &catalog), Level::A2);

    learn(&mut learned, Level::A2, A2_GOAL);
    assert_eq!(infer_level(&learned, &catalog), Level::B1);

    learn(&mut learned, Level::B1, B1_GOAL);
    assert_eq!(infer_level(&learned, &catalog), Level::B2);

    learn(&mut learned, Level::B2, B2_GOAL);
    assert_eq!(infer_level(&learned, &catalog), Level::C1);

    learn(&mut learned, Level::C1, C1_GOAL);
    assert_eq!(infer_level(&learned, &catalog), Level::C2);
}

#[test]
fn advanced_learning_cannot_skip_early_gates() {
    let catalog = graded_catalog();
    let mut learned = HashSet::new();
    // plenty of C1 work without finishing A1
    learn(&mut learned, Level::C1, 5);
    learn(&mut learned, Level::A1, A1_GOAL - 1);
    assert_eq!(infer_level(&learned, &catalog), Level::A1);
}

#[test]
fn one_short_of_a_gate_stays_put() {
    let catalog = graded_catalog();
    let mut learned = HashSet::new();
    learn(&mut learned, Level::A1, A1_GOAL);
    learn(&mut learned, Level::A2, A2_GOAL - 1);
    assert_eq!(infer_level(&learned, &catalog), Level::A2);
}

#[test]
fn level_progress_counts_per_tier() {
    let catalog = graded_catalog();
    let mut learned = HashSet::new();
    learn(&mut learned, Level::A1, 2);

    let rows = level_progress(&learned, &catalog);
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0].level, Level::A1);
    assert_eq!(rows[0].learned, 2);
    assert_eq!(rows[0].total, 4);
    assert!((rows[0].ratio() - 0.5).abs() < 1e-9);
    assert_eq!(rows[5].learned, 0);
}

#[test]
fn day_of_year_is_one_based_and_leap_aware() {
    assert_eq!(day_of_year(date(2026, 1, 1)), 1);
    assert_eq!(day_of_year(date(2026, 12, 31)), 365);
    // Feb 29 shifts later ordinals in leap years
    assert_eq!(day_of_year(date(2023, 3, 1)), 60);
    assert_eq!(day_of_year(date(2024, 3, 1)), 61);
}

#[test]
fn daily_pick_walks_the_pool_by_date() {
    let catalog = Catalog::new(vec![
        Idiom::new("A1-0", "First", "a", Level::A1),
        Idiom::new("A1-1", "Second", "b", Level::A1),
        Idiom::new("A1-2", "Third", "c", Level::A1),
    ])
    .unwrap();
    let progress = ProgressState::new(date(2026, 1, 1));

    assert_eq!(todays_idiom(&catalog, &progress, false, date(2026, 1, 1)).id, "A1-0");
    assert_eq!(todays_idiom(&catalog, &progress, false, date(2026, 1, 2)).id, "A1-1");
    assert_eq!(todays_idiom(&catalog, &progress, false, date(2026, 1, 3)).id, "A1-2");
    // wraps modulo pool size
    assert_eq!(todays_idiom(&catalog, &progress, false, date(2026, 1, 4)).id, "A1-0");
}

#[test]
fn same_date_always_picks_the_same_idiom() {
    let catalog = graded_catalog();
    let progress = ProgressState::new(date(2026, 5, 5));
    let a = todays_idiom(&catalog, &progress, false, date(2026, 5, 5)).id.clone();
    let b = todays_idiom(&catalog, &progress, false, date(2026, 5, 5)).id.clone();
    assert_eq!(a, b);
}

#[test]
fn learned_idioms_leave_the_pool_until_it_empties() {
    let catalog = Catalog::new(vec![
        Idiom::new("A1-0", "First", "a", Level::A1),
        Idiom::new("A1-1", "Second", "b", Level::A1),
    ])
    .unwrap();
    let mut progress = ProgressState::new(date(2026, 1, 1));
    progress.learned.insert("A1-0".to_string());

    let pool = eligible_idioms(&catalog, &progress, false);
    assert_eq!(pool.len(), 1);
    assert_eq!(pool[0].id, "A1-1");

    // everything learned: learned idioms come back
    progress.learned.insert("A1-1".to_string());
    let pool = eligible_idioms(&catalog, &progress, false);
    assert_eq!(pool.len(), 2);
}

#[test]
fn free_users_never_see_premium_idioms() {
    let catalog = Catalog::new(vec![
        Idiom::new("A1-0", "Open", "a", Level::A1),
        Idiom::new("A1-1", "Paid", "b", Level::A1).premium(),
    ])
    .unwrap();
    let progress = ProgressState::new(date(2026, 1, 1));

    let free_pool = eligible_idioms(&catalog, &progress, false);
    assert_eq!(free_pool.len(), 1);
    assert_eq!(free_pool[0].id, "A1-0");

    let pro_pool = eligible_idioms(&catalog, &progress, true);
    assert_eq!(pro_pool.len(), 2);
}

#[test]
fn free_tier_is_capped_at_the_free_levels() {
    let catalog = graded_catalog();
    let progress = ProgressState::new(date(2026, 1, 1));
    let pool = eligible_idioms(&catalog, &progress, false);
    assert!(!pool.is_empty());
    assert!(pool.iter().all(|i| FREE_LEVELS.contains(&i.level)));
}

#[test]
fn pro_pool_respects_the_inferred_level() {
    let catalog = graded_catalog();
    // fresh pro user infers A1, so only A1 idioms are level-appropriate
    let progress = ProgressState::new(date(2026, 1, 1));
    let pool = eligible_idioms(&catalog, &progress, true);
    assert!(pool.iter().all(|i| i.level == Level::A1));
}

#[test]
fn empty_pool_falls_back_to_whole_catalog() {
    // all premium, so a free user's pool is empty
    let catalog = Catalog::new(vec![
        Idiom::new("B2-0", "Paid one", "a", Level::B2).premium(),
        Idiom::new("B2-1", "Paid two", "b", Level::B2).premium(),
    ])
    .unwrap();
    let progress = ProgressState::new(date(2026, 1, 1));

    assert!(eligible_idioms(&catalog, &progress, false).is_empty());
    // Jan 2 -> ordinal 2 -> index 1
    let pick = todays_idiom(&catalog, &progress, false, date(2026, 1, 2));
    assert_eq!(pick.id, "B2-1");
}

#[test]
fn level_parses_from_text() {
    assert_eq!("B2".parse::<Level>().unwrap(), Level::B2);
    assert_eq!(" c1 ".parse::<Level>().unwrap(), Level::C1);
    assert!("Z9".parse::<Level>().is_err());
    assert_eq!(Level::A1.to_string(), "A1");
}
