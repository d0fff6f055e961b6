//! Per-node entry animation
//!
//! A revealed node rises from one unit below its target while growing from a
//! tiny non-zero scale. Position and scale are each eased toward the target
//! with exponential smoothing (`current = lerp(current, target, dt * speed)`),
//! which approaches fast then slow and never overshoots.
//!
//! Completion is a separate progress counter advancing at
//! [`ANIMATION_SPEED`] per second. It reaches 1 after roughly half a second
//! regardless of how far the pose still has to travel, so callers must expect
//! the pose to keep approaching its target after `completed` fires.

use worldgen_core::{SceneNode, Vec3};

/// Progress gained per second
pub const ANIMATION_SPEED: f32 = 2.0;
/// Position smoothing rate per second
pub const POSITION_SPEED: f32 = 2.5;
/// Scale smoothing rate per second
pub const SCALE_SPEED: f32 = 2.0;
/// Uniform scale a node enters with
pub const START_SCALE: f32 = 0.01;
/// How far below its target a node enters
pub const START_DROP: f32 = 1.0;

/// Transform state driven by the entry animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub scale: Vec3,
}

impl Pose {
    pub fn new(position: Vec3, scale: Vec3) -> Self {
        Self { position, scale }
    }

    /// The resting pose of a scene node
    pub fn of(node: &SceneNode) -> Self {
        Self::new(node.position, node.scale)
    }

    /// Starting pose for an entry toward `target`
    pub fn entry_start(target: &Pose) -> Self {
        let mut position = target.position;
        position.y -= START_DROP;
        Self::new(position, Vec3::splat(START_SCALE))
    }
}

/// Result of one [`advance`] call
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntryStep {
    pub progress: f32,
    pub completed: bool,
}

/// Step an entry animation by `dt` seconds
///
/// Moves `current` toward `target` and returns the new progress. A negative
/// `dt` counts as zero, and smoothing factors are capped at 1 so a long frame
/// lands on the target instead of passing it.
pub fn advance(current: &mut Pose, target: &Pose, progress: f32, dt: f32) -> EntryStep {
    let dt = dt.max(0.0);
    let progress = (progress + dt * ANIMATION_SPEED).min(1.0);

    current.position = current
        .position
        .lerp(&target.position, smoothing(dt, POSITION_SPEED));
    current.scale = current.scale.lerp(&target.scale, smoothing(dt, SCALE_SPEED));

    EntryStep {
        progress,
        completed: progress >= 1.0,
    }
}

fn smoothing(dt: f32, speed: f32) -> f32 {
    (dt * speed).clamp(0.0, 1.0)
}

/// Entry animation state for one node
#[derive(Clone, Copy, Debug)]
pub struct EntryAnimation {
    current: Pose,
    target: Pose,
    progress: f32,
    completed: bool,
}

impl EntryAnimation {
    pub fn new(target: Pose) -> Self {
        Self {
            current: Pose::entry_start(&target),
            target,
            progress: 0.0,
            completed: false,
        }
    }

    /// Step by `dt`; returns true on the step that completes the entry.
    /// Completed animations hold their last pose.
    pub fn step(&mut self, dt: f32) -> bool {
        if self.completed {
            return false;
        }
        let step = advance(&mut self.current, &self.target, self.progress, dt);
        self.progress = step.progress;
        self.completed = step.completed;
        step.completed
    }

    pub fn pose(&self) -> Pose {
        self.current
    }

    pub fn target(&self) -> Pose {
        self.target
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }
}
