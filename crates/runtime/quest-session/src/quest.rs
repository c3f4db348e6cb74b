//! Quest tracker
//!
//! Each action kind is a one-time quest worth 25 XP. A kind moves from
//! pending to credited exactly once per session; repeats change nothing.

use quest_core::{ActionKind, QuestProgress};
use std::collections::BTreeSet;

/// XP awarded per first-time action kind
pub const XP_PER_QUEST: u32 = 25;

/// Monotonic quest progress
#[derive(Debug, Clone, Default)]
pub struct QuestTracker {
    completed: BTreeSet<ActionKind>,
    xp: u32,
}

impl QuestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that an action was attempted
    pub fn record_action(&mut self, kind: ActionKind) -> QuestProgress {
        let is_new_credit = self.completed.insert(kind);
        if is_new_credit {
            self.xp += XP_PER_QUEST;
        }

        QuestProgress {
            is_new_credit,
            xp: self.xp,
            completed_count: self.completed.len(),
        }
    }

    /// Current totals without recording anything
    pub fn progress(&self) -> QuestProgress {
        QuestProgress {
            is_new_credit: false,
            xp: self.xp,
            completed_count: self.completed.len(),
        }
    }

    pub fn xp(&self) -> u32 {
        self.xp
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn is_completed(&self, kind: ActionKind) -> bool {
        self.completed.contains(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_credit() {
        let mut tracker = QuestTracker::new();
        let progress = tracker.record_action(ActionKind::List);
        assert!(progress.is_new_credit);
        assert_eq!(progress.xp, 25);
        assert_eq!(progress.completed_count, 1);
        assert!(tracker.is_completed(ActionKind::List));
    }

    #[test]
    fn test_repeat_is_idempotent() {
        let mut tracker = QuestTracker::new();
        tracker.record_action(ActionKind::Create);
        let again = tracker.record_action(ActionKind::Create);
        assert!(!again.is_new_credit);
        assert_eq!(again.xp, 25);
        assert_eq!(again.completed_count, 1);
    }

    #[test]
    fn test_xp_tracks_distinct_kinds() {
        let sequence = [
            ActionKind::List,
            ActionKind::List,
            ActionKind::Delete,
            ActionKind::Create,
            ActionKind::Delete,
            ActionKind::Update,
            ActionKind::List,
            ActionKind::Update,
        ];

        let mut tracker = QuestTracker::new();
        let mut seen = BTreeSet::new();
        for kind in sequence {
            let before = tracker.progress();
            let progress = tracker.record_action(kind);
            let fresh = seen.insert(kind);

            assert_eq!(progress.is_new_credit, fresh);
            assert_eq!(progress.xp, XP_PER_QUEST * seen.len() as u32);
            if !fresh {
                assert_eq!(progress.xp, before.xp);
                assert_eq!(progress.completed_count, before.completed_count);
            }
        }
        assert_eq!(tracker.xp(), 100);
        assert_eq!(tracker.completed_count(), 4);
    }
}
