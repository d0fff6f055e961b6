//! Worldgen Animation
//!
//! Time-driven presentation of a validated scene:
//!
//! - [`RevealScheduler`] flattens a scene into pre-order node paths and
//!   releases them into a visible set in small timed batches
//! - [`advance`] is the per-tick entry step that eases a revealed node from
//!   just below its target toward its final pose
//! - [`EntryTracker`] keeps one [`EntryAnimation`] per revealed path
//!
//! Timers run against an injectable [`Clock`] so everything here can be
//! driven deterministically with [`ManualClock`].
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use worldgen_animation::{RevealConfig, RevealScheduler};
//! use worldgen_core::{NodeKind, SceneGraph, SceneNode, Vec3};
//!
//! let scene = SceneGraph::empty()
//!     .with_node(SceneNode::new("a", NodeKind::BOX, Vec3::ZERO))
//!     .with_node(SceneNode::new("b", NodeKind::BOX, Vec3::ZERO));
//!
//! let mut reveal = RevealScheduler::new(RevealConfig::default());
//! reveal.reset(&scene);
//!
//! assert!(reveal.tick(Duration::ZERO, false).is_empty());
//! let revealed = reveal.tick(Duration::from_millis(50), false);
//! assert_eq!(revealed.as_slice(), ["a", "b"]);
//! ```

pub mod clock;
pub mod entry;
pub mod reveal;
pub mod tracker;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use entry::{
    advance, EntryAnimation, EntryStep, Pose, ANIMATION_SPEED, POSITION_SPEED, SCALE_SPEED,
    START_DROP, START_SCALE,
};
pub use reveal::{RevealConfig, RevealPhase, RevealScheduler};
pub use tracker::EntryTracker;
