use crate::models::IdiomId;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Milestone {
    FiveViews,
    TenViews,
    TwentyViews,
}

impl Milestone {
    pub const ALL: [Milestone; 3] = [
        Milestone::FiveViews,
        Milestone::TenViews,
        Milestone::TwentyViews,
    ];

    pub fn threshold(&self) -> u32 {
        match self {
            Milestone::FiveViews => 5,
            Milestone::TenViews => 10,
            Milestone::TwentyViews => 20,
        }
    }
}

/// Everything the app tracks about one user. Owned by the caller and passed
/// explicitly; persistence lives behind [`crate::prefs::PrefsStore`].
#[derive(Clone, Debug)]
pub struct ProgressState {
    pub viewed: HashSet<IdiomId>,
    pub learned: HashSet<IdiomId>,
    pub favorites: Vec<IdiomId>,
    pub daily_rotation: HashSet<IdiomId>,
    pub idioms_viewed: u32,
    pub quizzes_completed: u32,
    pub streak_days: u32,
    pub first_launch: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub milestone_5: bool,
    pub milestone_10: bool,
    pub milestone_20: bool,
    pub(crate) viewed_epoch: u64,
}

impl ProgressState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            viewed: HashSet::new(),
            learned: HashSet::new(),
            favorites: Vec::new(),
            daily_rotation: HashSet::new(),
            idioms_viewed: 0,
            quizzes_completed: 0,
            streak_days: 0,
            first_launch: now,
            last_active: now,
            milestone_5: false,
            milestone_10: false,
            milestone_20: false,
            viewed_epoch: 0,
        }
    }

    /// Counts a detail view. The total counter moves on every call; the
    /// viewed set only grows on the first sighting of an id. Returns the
    /// milestones that crossed their threshold on this call.
    pub fn record_view(&mut self, id: impl Into<IdiomId>, now: DateTime<Utc>) -> Vec<Milestone> {
        self.idioms_viewed += 1;
        self.touch(now);
        let fired = self.check_milestones();
        let id = id.into();
        if !self.viewed.contains(&id) {
            self.viewed.insert(id);
        }
        self.viewed_epoch += 1;
        fired
    }

    pub fn record_quiz_completed(&mut self, now: DateTime<Utc>) {
        self.quizzes_completed += 1;
        self.touch(now);
    }

    /// Marks an idiom learned after a passing quiz. Re-passing an already
    /// learned idiom changes nothing and returns false.
    pub fn record_learned(&mut self, id: impl Into<IdiomId>, now: DateTime<Utc>) -> bool {
        let id = id.into();
        if self.learned.contains(&id) {
            return false;
        }
        self.learned.insert(id);
        self.record_quiz_completed(now);
        true
    }

    pub fn add_favorite(&mut self, id: impl Into<IdiomId>, now: DateTime<Utc>) -> bool {
        self.touch(now);
        let id = id.into();
        if self.favorites.iter().any(|fav| *fav == id) {
            return false;
        }
        self.favorites.push(id);
        true
    }

    pub fn remove_favorite(&mut self, id: &str) -> bool {
        let before = self.favorites.len();
        self.favorites.retain(|fav| fav != id);
        self.favorites.len() != before
    }

    pub fn clear_favorites(&mut self) {
        self.favorites.clear();
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.iter().any(|fav| fav == id)
    }

    pub fn add_to_daily_rotation(&mut self, id: impl Into<IdiomId>) {
        self.daily_rotation.insert(id.into());
    }

    pub fn in_daily_rotation(&self, id: &str) -> bool {
        self.daily_rotation.contains(id)
    }

    pub fn has_viewed(&self, id: &str) -> bool {
        self.viewed.contains(id)
    }

    pub fn has_learned(&self, id: &str) -> bool {
        self.learned.contains(id)
    }

    /// Bumped whenever the viewed set may have changed. Unlock caches key on
    /// this instead of being cleared from call sites.
    pub fn viewed_epoch(&self) -> u64 {
        self.viewed_epoch
    }

    pub fn milestone_reached(&self, milestone: Milestone) -> bool {
        match milestone {
            Milestone::FiveViews => self.milestone_5,
            Milestone::TenViews => self.milestone_10,
            Milestone::TwentyViews => self.milestone_20,
        }
    }

    /// Registers activity at `now` and maintains the streak counter.
    /// Consecutive calendar days extend the streak; a gap restarts it at 1
    /// when there has been any viewing activity, 0 otherwise. Same-day calls
    /// only move `last_active`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        let today = now.date_naive();
        let last = self.last_active.date_naive();
        if last + Duration::days(1) == today {
            self.streak_days += 1;
        } else if last != today {
            self.streak_days = if self.idioms_viewed > 0 { 1 } else { 0 };
        }
        self.last_active = now;
    }

    fn check_milestones(&mut self) -> Vec<Milestone> {
        let mut fired = Vec::new();
        if self.idioms_viewed >= 5 && !self.milestone_5 {
            self.milestone_5 = true;
            fired.push(Milestone::FiveViews);
        }
        if self.idioms_viewed >= 10 && !self.milestone_10 {
            self.milestone_10 = true;
            fired.push(Milestone::TenViews);
        }
        if self.idioms_viewed >= 20 && !self.milestone_20 {
            self.milestone_20 = true;
            fired.push(Milestone::TwentyViews);
        }
        fired
    }

    /// Wipes counters, sets and milestone flags. Launch dates are kept.
    pub fn reset(&mut self) {
        self.viewed.clear();
        self.learned.clear();
        self.favorites.clear();
        self.daily_rotation.clear();
        self.idioms_viewed = 0;
        self.quizzes_completed = 0;
        self.streak_days = 0;
        self.milestone_5 = false;
        self.milestone_10 = false;
        self.milestone_20 = false;
        self.viewed_epoch += 1;
    }
}
