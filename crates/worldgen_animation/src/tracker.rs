//! Entry animations keyed by full node path

use crate::entry::{EntryAnimation, Pose};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

/// Owns one [`EntryAnimation`] per revealed node
///
/// Iteration follows the order nodes were begun, so the settled list
/// returned from [`tick`](EntryTracker::tick) is deterministic.
#[derive(Debug, Default)]
pub struct EntryTracker {
    animations: IndexMap<String, EntryAnimation, FxBuildHasher>,
    settled: usize,
}

impl EntryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start animating `path` toward `target`
    ///
    /// Returns false if the path already has an animation.
    pub fn begin(&mut self, path: impl Into<String>, target: Pose) -> bool {
        let path = path.into();
        if self.animations.contains_key(&path) {
            return false;
        }
        self.animations.insert(path, EntryAnimation::new(target));
        true
    }

    /// Step every unsettled animation, returning the paths that settled
    pub fn tick(&mut self, dt: f32) -> Vec<String> {
        let mut settled = Vec::new();
        for (path, animation) in self.animations.iter_mut() {
            if animation.step(dt) {
                settled.push(path.clone());
            }
        }
        self.settled += settled.len();
        settled
    }

    /// Current pose of `path`, if it has been begun
    pub fn pose(&self, path: &str) -> Option<Pose> {
        self.animations.get(path).map(EntryAnimation::pose)
    }

    pub fn get(&self, path: &str) -> Option<&EntryAnimation> {
        self.animations.get(path)
    }

    pub fn is_settled(&self, path: &str) -> bool {
        self.animations
            .get(path)
            .is_some_and(EntryAnimation::is_completed)
    }

    /// True when every begun animation has settled
    pub fn all_settled(&self) -> bool {
        self.settled == self.animations.len()
    }

    pub fn clear(&mut self) {
        self.animations.clear();
        self.settled = 0;
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.animations.len() - self.settled
    }

    pub fn settled_count(&self) -> usize {
        self.settled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use worldgen_core::Vec3;

    fn pose(y: f32) -> Pose {
        Pose::new(Vec3::new(0.0, y, 0.0), Vec3::ONE)
    }

    #[test]
    fn test_begin_is_idempotent() {
        let mut tracker = EntryTracker::new();
        assert!(tracker.begin("a", pose(1.0)));
        assert!(!tracker.begin("a", pose(5.0)));
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.get("a").unwrap().target(), pose(1.0));
    }

    #[test]
    fn test_staggered_settling() {
        let mut tracker = EntryTracker::new();
        tracker.begin("a", pose(0.0));

        for _ in 0..5 {
            assert!(tracker.tick(0.05).is_empty());
        }
        tracker.begin("b", pose(0.0));
        assert_eq!(tracker.active_count(), 2);

        // each needs about 10 steps of 0.05s
        let mut order = Vec::new();
        for _ in 0..12 {
            order.extend(tracker.tick(0.05));
        }
        assert_eq!(order, vec!["a", "b"]);
        assert!(tracker.all_settled());
        assert_eq!(tracker.settled_count(), 2);
    }

    #[test]
    fn test_pose_starts_below_target() {
        let mut tracker = EntryTracker::new();
        tracker.begin("a", pose(3.0));

        let start = tracker.pose("a").unwrap();
        assert_eq!(start.position.y, 2.0);
        assert!(tracker.pose("missing").is_none());
        assert!(!tracker.is_settled("a"));

        tracker.tick(1.0);
        assert!(tracker.is_settled("a"));
    }

    #[test]
    fn test_clear() {
        let mut tracker = EntryTracker::new();
        tracker.begin("a", pose(0.0));
        tracker.tick(1.0);
        tracker.clear();
        assert!(tracker.is_empty());
        assert_eq!(tracker.settled_count(), 0);
        assert!(tracker.all_settled());
    }
}
