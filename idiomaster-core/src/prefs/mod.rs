use crate::errors::CoreError;
use crate::progress::ProgressState;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashSet;

pub mod memory;

/// Preference keys. Names are part of the on-disk format and never change.
pub mod keys {
    pub const IDIOMS_VIEWED: &str = "idiomsViewed";
    pub const QUIZZES_COMPLETED: &str = "quizzesCompleted";
    pub const STREAK_DAYS: &str = "streakDays";
    pub const FIRST_LAUNCH_DATE: &str = "firstLaunchDate";
    pub const LAST_ACTIVE_DATE: &str = "lastActiveDate";
    pub const VIEWED_IDIOMS: &str = "viewedIdioms";
    pub const LEARNED_IDIOMS: &str = "learnedIdioms";
    pub const FAVORITE_IDIOM_IDS: &str = "favoriteIdiomIdsData";
    pub const DAILY_ROTATION_IDIOMS: &str = "dailyRotationIdioms";
    pub const MILESTONE_5: &str = "milestone5Reached";
    pub const MILESTONE_10: &str = "milestone10Reached";
    pub const MILESTONE_20: &str = "milestone20Reached";
    pub const HAS_LAUNCHED_BEFORE: &str = "hasLaunchedBefore";
    pub const IS_PRO: &str = "isPro";
    pub const TEST_DATE: &str = "testDate";
}

/// Flat key-value preference storage. Typed accessors treat values that fail
/// to decode the same as missing ones, so a damaged entry reads as a default
/// and is overwritten on the next save.
#[async_trait]
pub trait PrefsStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<Value>;
    async fn set(&self, key: &str, value: Value) -> Result<(), CoreError>;
    async fn remove(&self, key: &str) -> Result<(), CoreError>;
    async fn clear(&self) -> Result<(), CoreError>;
    async fn keys(&self) -> Vec<String>;

    async fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).await.and_then(|v| v.as_i64())
    }

    async fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).await.and_then(|v| v.as_bool())
    }

    async fn get_date(&self, key: &str) -> Option<DateTime<Utc>> {
        let value = self.get(key).await?;
        let text = value.as_str()?;
        DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|date| date.with_timezone(&Utc))
    }

    /// Id lists are stored as a JSON-array string inside the value, not as a
    /// bare JSON array. The string form is the on-disk contract.
    async fn get_id_blob(&self, key: &str) -> Option<Vec<String>> {
        let value = self.get(key).await?;
        let blob = value.as_str()?;
        serde_json::from_str(blob).ok()
    }

    async fn set_i64(&self, key: &str, value: i64) -> Result<(), CoreError> {
        self.set(key, Value::from(value)).await
    }

    async fn set_bool(&self, key: &str, value: bool) -> Result<(), CoreError> {
        self.set(key, Value::from(value)).await
    }

    async fn set_date(&self, key: &str, value: DateTime<Utc>) -> Result<(), CoreError> {
        self.set(key, Value::from(value.to_rfc3339())).await
    }

    async fn set_id_blob(&self, key: &str, ids: &[String]) -> Result<(), CoreError> {
        let blob =
            serde_json::to_string(ids).map_err(|_| CoreError::Storage("encode id blob"))?;
        self.set(key, Value::from(blob)).await
    }
}

/// Current date, honoring a pinned test date when one is set.
pub async fn current_date(prefs: &dyn PrefsStore) -> DateTime<Utc> {
    match prefs.get_date(keys::TEST_DATE).await {
        Some(pinned) => pinned,
        None => Utc::now(),
    }
}

pub async fn set_test_date(prefs: &dyn PrefsStore, date: DateTime<Utc>) -> Result<(), CoreError> {
    prefs.set_date(keys::TEST_DATE, date).await
}

pub async fn clear_test_date(prefs: &dyn PrefsStore) -> Result<(), CoreError> {
    prefs.remove(keys::TEST_DATE).await
}

pub async fn is_pro(prefs: &dyn PrefsStore) -> bool {
    prefs.get_bool(keys::IS_PRO).await.unwrap_or(false)
}

pub async fn set_pro(prefs: &dyn PrefsStore, pro: bool) -> Result<(), CoreError> {
    prefs.set_bool(keys::IS_PRO, pro).await
}

/// Loads progress, initializing fresh state on the first ever launch. The
/// launch itself counts as activity, so the streak is touched and the state
/// written back before returning.
pub async fn open_progress(
    prefs: &dyn PrefsStore,
    now: DateTime<Utc>,
) -> Result<ProgressState, CoreError> {
    let mut state = if prefs.get_bool(keys::HAS_LAUNCHED_BEFORE).await.is_none() {
        tracing::info!("first launch, starting fresh progress");
        prefs.set_bool(keys::HAS_LAUNCHED_BEFORE, true).await?;
        ProgressState::new(now)
    } else {
        read_progress(prefs, now).await
    };
    state.touch(now);
    save_progress(prefs, &state).await?;
    Ok(state)
}

async fn read_progress(prefs: &dyn PrefsStore, now: DateTime<Utc>) -> ProgressState {
    let mut state = ProgressState::new(now);
    state.idioms_viewed = read_count(prefs, keys::IDIOMS_VIEWED).await;
    state.quizzes_completed = read_count(prefs, keys::QUIZZES_COMPLETED).await;
    state.streak_days = read_count(prefs, keys::STREAK_DAYS).await;
    state.first_launch = prefs
        .get_date(keys::FIRST_LAUNCH_DATE)
        .await
        .unwrap_or(now);
    state.last_active = prefs.get_date(keys::LAST_ACTIVE_DATE).await.unwrap_or(now);
    state.viewed = read_id_set(prefs, keys::VIEWED_IDIOMS).await;
    state.learned = read_id_set(prefs, keys::LEARNED_IDIOMS).await;
    state.daily_rotation = read_id_set(prefs, keys::DAILY_ROTATION_IDIOMS).await;
    state.favorites = prefs
        .get_id_blob(keys::FAVORITE_IDIOM_IDS)
        .await
        .unwrap_or_default();
    state.milestone_5 = prefs.get_bool(keys::MILESTONE_5).await.unwrap_or(false);
    state.milestone_10 = prefs.get_bool(keys::MILESTONE_10).await.unwrap_or(false);
    state.milestone_20 = prefs.get_bool(keys::MILESTONE_20).await.unwrap_or(false);
    state
}

async fn read_count(prefs: &dyn PrefsStore, key: &str) -> u32 {
    prefs.get_i64(key).await.unwrap_or(0).max(0) as u32
}

async fn read_id_set(prefs: &dyn PrefsStore, key: &str) -> HashSet<String> {
    prefs
        .get_id_blob(key)
        .await
        .unwrap_or_default()
        .into_iter()
        .collect()
}

pub async fn save_progress(
    prefs: &dyn PrefsStore,
    state: &ProgressState,
) -> Result<(), CoreError> {
    prefs
        .set_i64(keys::IDIOMS_VIEWED, i64::from(state.idioms_viewed))
        .await?;
    prefs
        .set_i64(keys::QUIZZES_COMPLETED, i64::from(state.quizzes_completed))
        .await?;
    prefs
        .set_i64(keys::STREAK_DAYS, i64::from(state.streak_days))
        .await?;
    prefs
        .set_date(keys::FIRST_LAUNCH_DATE, state.first_launch)
        .await?;
    prefs
        .set_date(keys::LAST_ACTIVE_DATE, state.last_active)
        .await?;
    prefs
        .set_id_blob(keys::VIEWED_IDIOMS, &sorted(&state.viewed))
        .await?;
    prefs
        .set_id_blob(keys::LEARNED_IDIOMS, &sorted(&state.learned))
        .await?;
    prefs
        .set_id_blob(keys::DAILY_ROTATION_IDIOMS, &sorted(&state.daily_rotation))
        .await?;
    prefs
        .set_id_blob(keys::FAVORITE_IDIOM_IDS, &state.favorites)
        .await?;
    prefs.set_bool(keys::MILESTONE_5, state.milestone_5).await?;
    prefs
        .set_bool(keys::MILESTONE_10, state.milestone_10)
        .await?;
    prefs
        .set_bool(keys::MILESTONE_20, state.milestone_20)
        .await?;
    Ok(())
}

// Sets serialize in sorted order so saves are byte-stable.
fn sorted(ids: &HashSet<String>) -> Vec<String> {
    let mut out: Vec<String> = ids.iter().cloned().collect();
    out.sort();
    out
}
