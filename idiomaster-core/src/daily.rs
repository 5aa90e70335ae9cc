use crate::catalog::Catalog;
use crate::level::infer_level;
use crate::models::{Idiom, Level};
use crate::progress::ProgressState;
use chrono::{DateTime, Datelike, Utc};

/// Tiers open to free users.
pub const FREE_LEVELS: [Level; 3] = [Level::A1, Level::A2, Level::B1];

/// 1-based ordinal of the date, 1..=366. Feb 29 shifts every later day by
/// one in leap years, so the same calendar date can pick differently across
/// years. That drift is accepted.
pub fn day_of_year(now: DateTime<Utc>) -> u32 {
    now.ordinal()
}

fn level_appropriate(idiom_level: Level, user_level: Level) -> bool {
    idiom_level.index() <= user_level.index()
}

fn passes_tier_filters(idiom: &Idiom, user_level: Level, is_pro: bool) -> bool {
    if idiom.is_premium && !is_pro {
        return false;
    }
    if is_pro {
        level_appropriate(idiom.level, user_level)
    } else {
        FREE_LEVELS.contains(&idiom.level)
    }
}

/// Idioms the daily pick may choose from, in catalog order. Already-learned
/// idioms are held back until every idiom passing the tier filters has been
/// learned, at which point they rejoin the pool.
pub fn eligible_idioms<'a>(
    catalog: &'a Catalog,
    progress: &ProgressState,
    is_pro: bool,
) -> Vec<&'a Idiom> {
    let user_level = infer_level(&progress.learned, catalog);
    let mut available: Vec<&Idiom> = catalog
        .iter()
        .filter(|idiom| passes_tier_filters(idiom, user_level, is_pro))
        .collect();
    let unlearned: Vec<&Idiom> = available
        .iter()
        .copied()
        .filter(|idiom| !progress.learned.contains(&idiom.id))
        .collect();
    if !unlearned.is_empty() {
        available = unlearned;
    }
    available
}

/// Deterministic pick for the calendar day: index `(day_of_year - 1)` modulo
/// the eligible pool size. When nothing passes the tier filters at all, the
/// whole catalog is indexed instead so there is always an answer.
pub fn todays_idiom<'a>(
    catalog: &'a Catalog,
    progress: &ProgressState,
    is_pro: bool,
    now: DateTime<Utc>,
) -> &'a Idiom {
    let day = day_of_year(now) as usize;
    let pool = eligible_idioms(catalog, progress, is_pro);
    if pool.is_empty() {
        return &catalog.idioms()[(day - 1) % catalog.len()];
    }
    pool[(day - 1) % pool.len()]
}
