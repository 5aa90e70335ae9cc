use chrono::{DateTime, TimeZone, Utc};
use idiomaster_core::prefs::memory::MemoryPrefs;
use idiomaster_core::{
    current_date, is_unlocked, keys, open_progress, save_progress, set_test_date, Idiom, Level,
    Milestone, PrefsStore, ProgressState, UnlockCache,
};
use serde_json::Value;

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, d, 9, 0, 0).unwrap()
}

#[test]
fn repeat_views_count_but_set_stays_unique() {
    let mut p = ProgressState::new(day(1));
    p.record_view("A1-1", day(1));
    p.record_view("A1-1", day(1));
    p.record_view("A1-1", day(1));
    assert_eq!(p.idioms_viewed, 3);
    assert_eq!(p.viewed.len(), 1);
    assert_eq!(p.viewed_epoch(), 3);
}

#[test]
fn milestones_fire_once_at_thresholds() {
    let mut p = ProgressState::new(day(1));
    let mut fired = Vec::new();
    for i in 0..6 {
        fired = p.record_view(format!("id-{i}"), day(1));
        if i < 4 {
            assert!(fired.is_empty());
        }
    }
    // 5th view fired, 6th did not
    assert!(p.milestone_reached(Milestone::FiveViews));
    assert!(fired.is_empty());

    for i in 6..10 {
        fired = p.record_view(format!("id-{i}"), day(1));
    }
    assert_eq!(fired, vec![Milestone::TenViews]);
    assert!(!p.milestone_reached(Milestone::TwentyViews));
}

#[tokio::test]
async fn milestones_stay_fired_across_persistence() {
    let prefs = MemoryPrefs::new();
    let mut p = open_progress(&prefs, day(1)).await.unwrap();
    for i in 0..5 {
        p.record_view(format!("id-{i}"), day(1));
    }
    save_progress(&prefs, &p).await.unwrap();

    let mut reloaded = open_progress(&prefs, day(1)).await.unwrap();
    assert_eq!(reloaded.idioms_viewed, 5);
    let fired = reloaded.record_view("id-5", day(1));
    assert!(fired.is_empty());
}

#[test]
fn streak_same_day_is_a_noop() {
    let mut p = ProgressState::new(day(1));
    p.record_view("a", day(1));
    assert_eq!(p.streak_days, 0);
    p.record_view("b", day(1));
    assert_eq!(p.streak_days, 0);
}

#[test]
fn streak_grows_on_consecutive_days() {
    let mut p = ProgressState::new(day(1));
    p.record_view("a", day(1));
    p.record_view("b", day(2));
    assert_eq!(p.streak_days, 1);
    p.record_view("c", day(3));
    assert_eq!(p.streak_days, 2);
}

#[test]
fn streak_resets_after_a_gap() {
    let mut p = ProgressState::new(day(1));
    p.record_view("a", day(1));
    p.record_view("b", day(2));
    assert_eq!(p.streak_days, 1);
    // two-day gap, but views exist so the reset lands on 1
    p.record_view("c", day(5));
    assert_eq!(p.streak_days, 1);
}

#[test]
fn streak_reset_without_views_is_zero() {
    let mut p = ProgressState::new(day(1));
    p.touch(day(4));
    assert_eq!(p.streak_days, 0);
}

#[test]
fn learned_records_one_quiz_completion() {
    let mut p = ProgressState::new(day(1));
    assert!(p.record_learned("A1-1", day(1)));
    assert_eq!(p.quizzes_completed, 1);
    assert!(p.has_learned("A1-1"));
    // re-passing changes nothing
    assert!(!p.record_learned("A1-1", day(1)));
    assert_eq!(p.quizzes_completed, 1);
}

#[test]
fn favorites_are_ordered_and_deduped() {
    let mut p = ProgressState::new(day(1));
    assert!(p.add_favorite("B1-1", day(1)));
    assert!(p.add_favorite("A2-1", day(1)));
    assert!(!p.add_favorite("B1-1", day(1)));
    assert_eq!(p.favorites, vec!["B1-1", "A2-1"]);
    assert!(p.remove_favorite("B1-1"));
    assert!(!p.remove_favorite("B1-1"));
    assert_eq!(p.favorites, vec!["A2-1"]);

    p.clear_favorites();
    assert!(p.favorites.is_empty());
    assert!(!p.is_favorite("A2-1"));
}

#[test]
fn reset_wipes_counters_but_keeps_launch_dates() {
    let mut p = ProgressState::new(day(1));
    p.record_view("a", day(1));
    p.record_learned("a", day(1));
    p.add_favorite("a", day(1));
    p.add_to_daily_rotation("a");
    let first_launch = p.first_launch;
    let epoch = p.viewed_epoch();

    p.reset();
    assert_eq!(p.idioms_viewed, 0);
    assert_eq!(p.quizzes_completed, 0);
    assert_eq!(p.streak_days, 0);
    assert!(p.viewed.is_empty());
    assert!(p.learned.is_empty());
    assert!(p.favorites.is_empty());
    assert!(p.daily_rotation.is_empty());
    for milestone in Milestone::ALL {
        assert!(!p.milestone_reached(milestone));
    }
    assert_eq!(p.first_launch, first_launch);
    assert!(p.viewed_epoch() > epoch);
}

#[tokio::test]
async fn first_launch_initializes_then_roundtrips() {
    let prefs = MemoryPrefs::new();
    let mut p = open_progress(&prefs, day(1)).await.unwrap();
    assert_eq!(p.idioms_viewed, 0);
    assert_eq!(prefs.get_bool(keys::HAS_LAUNCHED_BEFORE).await, Some(true));

    p.record_view("A1-1", day(1));
    p.record_learned("A1-1", day(1));
    p.add_favorite("A1-1", day(1));
    p.add_to_daily_rotation("A1-1");
    save_progress(&prefs, &p).await.unwrap();

    let reloaded = open_progress(&prefs, day(1)).await.unwrap();
    assert_eq!(reloaded.idioms_viewed, 1);
    assert_eq!(reloaded.quizzes_completed, 1);
    assert!(reloaded.has_viewed("A1-1"));
    assert!(reloaded.has_learned("A1-1"));
    assert_eq!(reloaded.favorites, vec!["A1-1"]);
    assert!(reloaded.in_daily_rotation("A1-1"));
    assert!(!reloaded.in_daily_rotation("B1-1"));
    assert_eq!(reloaded.first_launch, p.first_launch);
}

#[tokio::test]
async fn corrupted_blob_reads_as_empty_and_heals() {
    let prefs = MemoryPrefs::new();
    let p = open_progress(&prefs, day(1)).await.unwrap();
    drop(p);

    prefs
        .set(keys::VIEWED_IDIOMS, Value::from("{not json"))
        .await
        .unwrap();
    prefs
        .set(keys::IDIOMS_VIEWED, Value::from("seven"))
        .await
        .unwrap();

    let mut p = open_progress(&prefs, day(1)).await.unwrap();
    assert!(p.viewed.is_empty());
    assert_eq!(p.idioms_viewed, 0);

    p.record_view("A1-1", day(1));
    save_progress(&prefs, &p).await.unwrap();
    assert_eq!(
        prefs.get_id_blob(keys::VIEWED_IDIOMS).await,
        Some(vec!["A1-1".to_string()])
    );
}

#[tokio::test]
async fn pinned_test_date_drives_current_date() {
    let prefs = MemoryPrefs::new();
    let pinned = day(15);
    set_test_date(&prefs, pinned).await.unwrap();
    assert_eq!(current_date(&prefs).await, pinned);

    idiomaster_core::clear_test_date(&prefs).await.unwrap();
    assert!(prefs.get(keys::TEST_DATE).await.is_none());
}

#[test]
fn viewing_unlocks_and_pro_unlocks_everything() {
    let idiom = Idiom::new("B2-1", "Bite the bullet", "覚悟を決める", Level::B2).premium();
    let mut p = ProgressState::new(day(1));

    assert!(!is_unlocked(&idiom, &p, false));
    assert!(is_unlocked(&idiom, &p, true));

    p.record_view("B2-1", day(1));
    assert!(is_unlocked(&idiom, &p, false));
}

#[test]
fn empty_ids_collide_on_unlock() {
    // two records without ids share the empty id, so viewing one opens both
    let first = Idiom::new("", "First", "一つ目", Level::A1);
    let second = Idiom::new("", "Second", "二つ目", Level::A1);
    let mut p = ProgressState::new(day(1));
    p.record_view(first.id.clone(), day(1));
    assert!(is_unlocked(&second, &p, false));
}

#[test]
fn unlock_cache_restamps_on_view_and_plan_change() {
    let idiom = Idiom::new("A1-1", "Long time no see", "久しぶり", Level::A1);
    let mut p = ProgressState::new(day(1));
    let mut cache = UnlockCache::new();

    assert!(!cache.check(&idiom, &p, false));
    assert_eq!(cache.len(), 1);

    // a recorded view bumps the epoch, dropping the memo
    p.record_view("A1-1", day(1));
    assert!(cache.check(&idiom, &p, false));

    // plan flip restamps too
    assert!(cache.check(&idiom, &p, true));
    assert_eq!(cache.len(), 1);
}
