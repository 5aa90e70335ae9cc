use crate::catalog::Catalog;
use crate::models::{IdiomId, Level};
use std::collections::HashSet;

// Learned-count gates a user clears to move past each tier.
pub const A1_GOAL: usize = 3;
pub const A2_GOAL: usize = 5;
pub const B1_GOAL: usize = 8;
pub const B2_GOAL: usize = 10;
pub const C1_GOAL: usize = 5;

/// Derives the user's CEFR level from how many idioms they have learned per
/// tier. Gates are sequential: the first unmet gate is the user's level, so
/// learned C1 idioms cannot skip an unfinished A2.
pub fn infer_level(learned_ids: &HashSet<IdiomId>, catalog: &Catalog) -> Level {
    let mut counts = [0usize; 6];
    for idiom in catalog.iter() {
        if learned_ids.contains(&idiom.id) {
            counts[idiom.level.index()] += 1;
        }
    }
    if counts[Level::A1.index()] < A1_GOAL {
        Level::A1
    } else if counts[Level::A2.index()] < A2_GOAL {
        Level::A2
    } else if counts[Level::B1.index()] < B1_GOAL {
        Level::B1
    } else if counts[Level::B2.index()] < B2_GOAL {
        Level::B2
    } else if counts[Level::C1.index()] < C1_GOAL {
        Level::C1
    } else {
        Level::C2
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelProgress {
    pub level: Level,
    pub learned: usize,
    pub total: usize,
}

impl LevelProgress {
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.learned as f64 / self.total as f64
        }
    }
}

/// Learned-vs-available counts per tier, in tier order.
pub fn level_progress(learned_ids: &HashSet<IdiomId>, catalog: &Catalog) -> Vec<LevelProgress> {
    Level::ALL
        .iter()
        .map(|&level| {
            let mut total = 0;
            let mut learned = 0;
            for idiom in catalog.iter() {
                if idiom.level != level {
                    continue;
                }
                total += 1;
                if learned_ids.contains(&idiom.id) {
                    learned += 1;
                }
            }
            LevelProgress {
                level,
                learned,
                total,
            }
        })
        .collect()
}
