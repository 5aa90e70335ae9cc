use crate::models::{Idiom, IdiomId};
use crate::progress::ProgressState;
use std::collections::HashMap;

/// An idiom is readable once it has appeared as a daily pick (and been
/// viewed) or the user is on the Pro plan, which opens everything.
pub fn is_unlocked(idiom: &Idiom, progress: &ProgressState, is_pro: bool) -> bool {
    is_pro || progress.has_viewed(&idiom.id)
}

/// Memoizes unlock answers for library listings. Entries are stamped with
/// `(viewed_epoch, is_pro)`; a lookup under a different stamp drops the memo,
/// so callers never have to invalidate by hand.
#[derive(Debug, Default)]
pub struct UnlockCache {
    stamp: Option<(u64, bool)>,
    memo: HashMap<IdiomId, bool>,
}

impl UnlockCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, idiom: &Idiom, progress: &ProgressState, is_pro: bool) -> bool {
        let stamp = (progress.viewed_epoch(), is_pro);
        if self.stamp != Some(stamp) {
            self.memo.clear();
            self.stamp = Some(stamp);
        }
        if let Some(&hit) = self.memo.get(&idiom.id) {
            return hit;
        }
        let unlocked = is_unlocked(idiom, progress, is_pro);
        self.memo.insert(idiom.id.clone(), unlocked);
        unlocked
    }

    pub fn len(&self) -> usize {
        self.memo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }
}
