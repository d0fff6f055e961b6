//! Progressive reveal scheduler
//!
//! Turns a validated scene into a staggered build-out. On [`reset`] the
//! whole tree is flattened into pre-order full paths (a parent always before
//! its children) and queued. Each [`tick`] may start a batch of up to
//! `batch_size` paths from the front of the queue. A started batch is
//! published to the visible set `publish_delay` later, and the next batch may
//! start only after a further `cooldown`. Both delays are measured on the
//! caller's clock, independent of frame rate.
//!
//! While generation is in progress no new batch starts. A batch already in
//! flight still publishes on schedule.
//!
//! [`reset`]: RevealScheduler::reset
//! [`tick`]: RevealScheduler::tick

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::VecDeque;
use std::time::Duration;
use worldgen_core::SceneGraph;

/// Reveal tunables
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct RevealConfig {
    /// Paths released per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Delay between starting a batch and publishing it
    #[serde(default = "default_publish_delay_ms")]
    pub publish_delay_ms: u64,
    /// Delay after publishing before the next batch may start
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
}

fn default_batch_size() -> usize {
    3
}

fn default_publish_delay_ms() -> u64 {
    50
}

fn default_cooldown_ms() -> u64 {
    50
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            publish_delay_ms: default_publish_delay_ms(),
            cooldown_ms: default_cooldown_ms(),
        }
    }
}

impl RevealConfig {
    pub fn publish_delay(&self) -> Duration {
        Duration::from_millis(self.publish_delay_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

/// Where the scheduler stands for the current scene
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealPhase {
    /// Nothing in flight: no scene, generation in progress, or waiting for
    /// the next tick to start a batch
    Idle,
    /// A batch is waiting to publish or cooling down
    Releasing,
    /// Every path is visible; terminal until the next reset
    Complete,
}

#[derive(Clone, Copy, Debug)]
struct InFlight {
    /// Front-of-queue paths belonging to this batch
    len: usize,
    publish_at: Duration,
    cooldown_until: Duration,
    published: bool,
}

/// Batches scene paths from pending into visible over time
#[derive(Debug)]
pub struct RevealScheduler {
    config: RevealConfig,
    pending: VecDeque<String>,
    visible: IndexSet<String>,
    in_flight: Option<InFlight>,
    loaded: bool,
    generation_in_progress: bool,
}

impl RevealScheduler {
    pub fn new(config: RevealConfig) -> Self {
        Self {
            config,
            pending: VecDeque::new(),
            visible: IndexSet::new(),
            in_flight: None,
            loaded: false,
            generation_in_progress: false,
        }
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    /// Start over for a new scene, abandoning any batch in flight
    pub fn reset(&mut self, scene: &SceneGraph) {
        let abandoned = self.in_flight.take().is_some();
        self.visible.clear();
        self.pending = scene.paths().into();
        self.loaded = true;

        tracing::debug!(
            "Reveal reset for scene '{}': {} paths queued{}",
            scene.id,
            self.pending.len(),
            if abandoned { " (in-flight batch abandoned)" } else { "" }
        );
    }

    /// Drop all state; the scheduler idles until the next reset
    pub fn clear(&mut self) {
        self.pending.clear();
        self.visible.clear();
        self.in_flight = None;
        self.loaded = false;
    }

    /// Advance timers to `now` and start a batch if allowed
    ///
    /// Returns the paths that became visible during this call, in queue
    /// order.
    pub fn tick(&mut self, now: Duration, generation_in_progress: bool) -> SmallVec<[String; 4]> {
        self.generation_in_progress = generation_in_progress;

        let mut revealed = SmallVec::new();
        self.poll_in_flight(now, &mut revealed);

        if self.in_flight.is_none() && !generation_in_progress && !self.pending.is_empty() {
            let len = self.config.batch_size.max(1).min(self.pending.len());
            let publish_at = now + self.config.publish_delay();
            self.in_flight = Some(InFlight {
                len,
                publish_at,
                cooldown_until: publish_at + self.config.cooldown(),
                published: false,
            });
            tracing::trace!("Reveal batch of {} started", len);

            // zero delays resolve within the same tick
            self.poll_in_flight(now, &mut revealed);
        }

        revealed
    }

    fn poll_in_flight(&mut self, now: Duration, revealed: &mut SmallVec<[String; 4]>) {
        let Some(batch) = self.in_flight.as_mut() else {
            return;
        };

        if !batch.published && now >= batch.publish_at {
            batch.published = true;
            for path in self.pending.drain(..batch.len) {
                self.visible.insert(path.clone());
                revealed.push(path);
            }
            tracing::debug!(
                "Reveal batch published: {} visible, {} pending",
                self.visible.len(),
                self.pending.len()
            );
        }

        if batch.published && now >= batch.cooldown_until {
            self.in_flight = None;
        }
    }

    pub fn phase(&self) -> RevealPhase {
        if self.in_flight.is_some() {
            RevealPhase::Releasing
        } else if self.loaded && self.pending.is_empty() && !self.generation_in_progress {
            RevealPhase::Complete
        } else {
            RevealPhase::Idle
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase() == RevealPhase::Complete
    }

    pub fn is_visible(&self, path: &str) -> bool {
        self.visible.contains(path)
    }

    /// Visible paths in reveal order
    pub fn visible(&self) -> impl Iterator<Item = &str> {
        self.visible.iter().map(String::as_str)
    }

    /// Paths not yet visible, front of the queue first
    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.pending.iter().map(String::as_str)
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Paths in the current scene
    pub fn total(&self) -> usize {
        self.visible.len() + self.pending.len()
    }
}

impl Default for RevealScheduler {
    fn default() -> Self {
        Self::new(RevealConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use worldgen_core::{NodeKind, SceneNode, Vec3};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn leaf(id: &str) -> SceneNode {
        SceneNode::new(id, NodeKind::BOX, Vec3::ZERO)
    }

    fn flat_scene(ids: &[&str]) -> SceneGraph {
        ids.iter()
            .fold(SceneGraph::empty(), |scene, id| scene.with_node(leaf(id)))
    }

    #[test]
    fn test_pre_order_queue() {
        let scene = SceneGraph::empty().with_node(leaf("A").with_child(leaf("B")).with_child(leaf("C")));

        let mut reveal = RevealScheduler::default();
        reveal.reset(&scene);
        assert_eq!(reveal.pending().collect::<Vec<_>>(), vec!["A", "A.B", "A.C"]);
        assert_eq!(reveal.phase(), RevealPhase::Idle);
    }

    #[test]
    fn test_batches_of_three_fifo() {
        let ids = ["a", "b", "c", "d", "e", "f", "g"];
        let mut reveal = RevealScheduler::default();
        reveal.reset(&flat_scene(&ids));

        assert!(reveal.tick(ms(0), false).is_empty());
        assert_eq!(reveal.phase(), RevealPhase::Releasing);
        assert!(reveal.tick(ms(49), false).is_empty());

        let first = reveal.tick(ms(50), false);
        assert_eq!(first.as_slice(), ["a", "b", "c"]);
        assert_eq!(reveal.visible_count(), 3);
        assert_eq!(reveal.pending_count(), 4);

        // cooldown ends and the next batch starts on the same tick
        assert!(reveal.tick(ms(100), false).is_empty());
        assert_eq!(reveal.tick(ms(150), false).as_slice(), ["d", "e", "f"]);
        assert!(reveal.tick(ms(200), false).is_empty());
        assert_eq!(reveal.tick(ms(250), false).as_slice(), ["g"]);
        assert_eq!(reveal.phase(), RevealPhase::Releasing);

        reveal.tick(ms(300), false);
        assert_eq!(reveal.phase(), RevealPhase::Complete);
        assert_eq!(reveal.visible().collect::<Vec<_>>(), ids);
        assert_eq!(reveal.total(), 7);
    }

    #[test]
    fn test_generation_gates_batch_start() {
        let mut reveal = RevealScheduler::default();
        reveal.reset(&flat_scene(&["a", "b", "c", "d"]));

        for t in 0..10 {
            assert!(reveal.tick(ms(t * 50), true).is_empty());
            assert_eq!(reveal.phase(), RevealPhase::Idle);
        }

        reveal.tick(ms(500), false);
        // in-flight batch still publishes while generation resumes
        assert_eq!(reveal.tick(ms(550), true).len(), 3);
        reveal.tick(ms(600), true);
        assert_eq!(reveal.phase(), RevealPhase::Idle);
        assert_eq!(reveal.pending_count(), 1);
    }

    #[test]
    fn test_not_complete_while_generating() {
        let mut reveal = RevealScheduler::default();
        reveal.reset(&flat_scene(&["a"]));
        reveal.tick(ms(0), false);
        reveal.tick(ms(50), false);
        reveal.tick(ms(100), true);
        assert_eq!(reveal.phase(), RevealPhase::Idle);
        reveal.tick(ms(150), false);
        assert_eq!(reveal.phase(), RevealPhase::Complete);
    }

    #[test]
    fn test_reset_abandons_in_flight_batch() {
        let mut reveal = RevealScheduler::default();
        reveal.reset(&flat_scene(&["old_1", "old_2", "old_3", "old_4"]));
        reveal.tick(ms(0), false);
        reveal.tick(ms(50), false);
        reveal.tick(ms(100), false);
        assert_eq!(reveal.phase(), RevealPhase::Releasing);

        reveal.reset(&flat_scene(&["new_1"]));
        assert_eq!(reveal.visible_count(), 0);
        assert_eq!(reveal.phase(), RevealPhase::Idle);

        let mut seen = Vec::new();
        for t in 3..10 {
            seen.extend(reveal.tick(ms(t * 50), false));
        }
        assert_eq!(seen, vec!["new_1"]);
        assert!(!reveal.is_visible("old_4"));
    }

    #[test]
    fn test_zero_delays_publish_immediately() {
        let config = RevealConfig {
            batch_size: 2,
            publish_delay_ms: 0,
            cooldown_ms: 0,
        };
        let mut reveal = RevealScheduler::new(config);
        reveal.reset(&flat_scene(&["a", "b", "c"]));

        assert_eq!(reveal.tick(ms(0), false).as_slice(), ["a", "b"]);
        assert_eq!(reveal.tick(ms(0), false).as_slice(), ["c"]);
        assert!(reveal.is_complete());
    }

    #[test]
    fn test_clear_returns_to_idle() {
        let mut reveal = RevealScheduler::default();
        reveal.reset(&flat_scene(&["a"]));
        reveal.clear();
        assert_eq!(reveal.phase(), RevealPhase::Idle);
        assert!(reveal.tick(ms(100), false).is_empty());
        assert_eq!(reveal.total(), 0);
    }

    #[test]
    fn test_config_defaults_from_partial_json() {
        let config: RevealConfig = serde_json::from_str(r#"{ "batch_size": 5 }"#).unwrap();
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.publish_delay_ms, 50);
        assert_eq!(config.cooldown_ms, 50);
    }
}
