use crate::catalog::Catalog;
use crate::level::{infer_level, level_progress, LevelProgress};
use crate::models::Level;
use crate::progress::ProgressState;
use chrono::{DateTime, Utc};

#[derive(Clone, Debug)]
pub struct ProgressSummary {
    pub idioms_viewed: u32,
    pub unique_viewed: usize,
    pub learned: usize,
    pub quizzes_completed: u32,
    pub favorites: usize,
    pub streak_days: u32,
    pub user_level: Level,
    pub days_since_first_launch: i64,
    pub average_per_day: f64,
    pub learning_efficiency: f64,
    pub per_level: Vec<LevelProgress>,
}

impl ProgressSummary {
    pub fn is_active_learner(&self) -> bool {
        self.average_per_day >= 1.0 || self.streak_days >= 3
    }

    pub fn should_show_encouragement(&self) -> bool {
        self.days_since_first_launch >= 3 && self.average_per_day < 0.5
    }
}

/// Engagement units: a view is 1, a quiz 2, a favorite 0.5.
fn engagement_score(progress: &ProgressState) -> f64 {
    progress.idioms_viewed as f64
        + progress.quizzes_completed as f64 * 2.0
        + progress.favorites.len() as f64 * 0.5
}

pub fn summarize(progress: &ProgressState, catalog: &Catalog, now: DateTime<Utc>) -> ProgressSummary {
    let days_since_first_launch =
        (now.date_naive() - progress.first_launch.date_naive()).num_days();
    let days = days_since_first_launch.max(1) as f64;
    ProgressSummary {
        idioms_viewed: progress.idioms_viewed,
        unique_viewed: progress.viewed.len(),
        learned: progress.learned.len(),
        quizzes_completed: progress.quizzes_completed,
        favorites: progress.favorites.len(),
        streak_days: progress.streak_days,
        user_level: infer_level(&progress.learned, catalog),
        days_since_first_launch,
        average_per_day: progress.idioms_viewed as f64 / days,
        learning_efficiency: engagement_score(progress) / days,
        per_level: level_progress(&progress.learned, catalog),
    }
}
