//! World generation session
//!
//! Generation happens in two steps. [`generate_world`] runs the request and,
//! on success, installs an empty placeholder scene with `is_generating` set.
//! The real scene is staged and installed by the first [`tick`] at or after
//! `install_delay`. While the placeholder is up the reveal scheduler is
//! gated, so nothing starts revealing before the real scene lands.
//!
//! Starting a new generation or clearing the scene drops all reveal and
//! animation state of the previous scene at once; nothing drains.
//!
//! [`generate_world`]: WorldGenSession::generate_world
//! [`tick`]: WorldGenSession::tick

use crate::error::{Result, SessionError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use worldgen_animation::{
    Clock, EntryTracker, MonotonicClock, Pose, RevealConfig, RevealPhase, RevealScheduler,
};
use worldgen_characters::{CharacterAction, CharacterStore};
use worldgen_core::{validate, SceneGraph, SceneNode};
use worldgen_service::{handle_generate, Generator, ResponseBody, UNKNOWN_ERROR};

/// Session tunables
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Delay between a successful response and the scene replacing the
    /// placeholder
    #[serde(default = "default_install_delay_ms")]
    pub install_delay_ms: u64,
    /// Delay before a scripted character answers the player
    #[serde(default = "default_reply_delay_ms")]
    pub reply_delay_ms: u64,
    #[serde(default)]
    pub reveal: RevealConfig,
}

fn default_install_delay_ms() -> u64 {
    1000
}

fn default_reply_delay_ms() -> u64 {
    1000
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reveal: RevealConfig::default(),
            install_delay_ms: default_install_delay_ms(),
            reply_delay_ms: default_reply_delay_ms(),
        }
    }
}

impl SessionConfig {
    pub fn install_delay(&self) -> Duration {
        Duration::from_millis(self.install_delay_ms)
    }

    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }
}

/// What changed during one [`WorldGenSession::tick`]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// The staged scene replaced the placeholder this frame
    pub installed: bool,
    /// Paths that became visible, in reveal order
    pub revealed: Vec<String>,
    /// Paths whose entry animation completed
    pub settled: Vec<String>,
    /// Scripted character replies that fired
    pub replies: Vec<CharacterAction>,
}

impl FrameReport {
    pub fn is_empty(&self) -> bool {
        !self.installed
            && self.revealed.is_empty()
            && self.settled.is_empty()
            && self.replies.is_empty()
    }
}

#[derive(Debug)]
struct StagedScene {
    scene: Arc<SceneGraph>,
    install_at: Duration,
}

/// Owns all mutable world-generation state
pub struct WorldGenSession<C: Clock = MonotonicClock> {
    config: SessionConfig,
    clock: C,
    prompt: String,
    scene: Option<Arc<SceneGraph>>,
    staged: Option<StagedScene>,
    is_loading: bool,
    is_generating: bool,
    error: Option<String>,
    reveal: RevealScheduler,
    entries: EntryTracker,
    characters: CharacterStore,
}

impl WorldGenSession<MonotonicClock> {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_clock(config, MonotonicClock::new())
    }
}

impl<C: Clock> WorldGenSession<C> {
    pub fn with_clock(config: SessionConfig, clock: C) -> Self {
        Self {
            reveal: RevealScheduler::new(config.reveal),
            entries: EntryTracker::new(),
            characters: CharacterStore::new(config.reply_delay()),
            config,
            clock,
            prompt: String::new(),
            scene: None,
            staged: None,
            is_loading: false,
            is_generating: false,
            error: None,
        }
    }

    /// Request a new world for `prompt`
    ///
    /// Cancels the current scene first. On failure the message is kept in
    /// [`error`](Self::error) as well as returned.
    pub async fn generate_world<G: Generator>(
        &mut self,
        prompt: impl Into<String>,
        generator: &G,
    ) -> Result<()> {
        let prompt = prompt.into();
        self.cancel();
        self.prompt = prompt.clone();
        self.is_loading = true;
        self.error = None;

        let response = handle_generate(generator, &serde_json::json!({ "prompt": prompt })).await;
        let status = response.status;

        let scene = match response.body {
            ResponseBody::Scene { scene } => scene,
            ResponseBody::Error { error } => {
                let message = if error.is_empty() {
                    UNKNOWN_ERROR.to_string()
                } else {
                    error
                };
                tracing::warn!("World generation failed: {}", message);

                self.is_loading = false;
                self.is_generating = false;
                self.error = Some(message.clone());
                return Err(SessionError::Generation { status, message });
            }
        };

        // the response crossed a trust boundary; validate again
        let scene = match serde_json::to_value(&scene) {
            Ok(raw) => validate(&raw),
            Err(_) => scene,
        };

        let placeholder = Arc::new(SceneGraph::empty());
        self.reveal.reset(&placeholder);
        self.scene = Some(placeholder);
        self.is_loading = false;
        self.is_generating = true;

        let install_at = self.clock.now() + self.config.install_delay();
        tracing::info!(
            "Scene '{}' received ({} nodes), installing in {:?}",
            scene.id,
            scene.node_count(),
            self.config.install_delay()
        );
        self.staged = Some(StagedScene {
            scene: Arc::new(scene),
            install_at,
        });
        Ok(())
    }

    /// Advance one frame of `dt` seconds
    pub fn tick(&mut self, dt: f32) -> FrameReport {
        let now = self.clock.now();
        let mut report = FrameReport::default();

        if self.staged.as_ref().is_some_and(|staged| now >= staged.install_at) {
            if let Some(staged) = self.staged.take() {
                self.install(staged.scene);
                report.installed = true;
            }
        }

        let revealed = self.reveal.tick(now, self.is_generating);
        if let Some(scene) = &self.scene {
            for path in &revealed {
                match scene.find_path(path) {
                    Some(node) => {
                        self.entries.begin(path.as_str(), Pose::of(node));
                    }
                    None => tracing::warn!("Revealed path {} is not in the scene", path),
                }
            }
        }
        report.revealed = revealed.into_vec();

        report.settled = self.entries.tick(dt);
        report.replies = self.characters.tick(now);
        report
    }

    fn install(&mut self, scene: Arc<SceneGraph>) {
        tracing::info!("Installing scene '{}' ({} nodes)", scene.id, scene.node_count());
        self.entries.clear();
        self.reveal.reset(&scene);
        self.scene = Some(scene);
        self.is_generating = false;
    }

    fn cancel(&mut self) {
        if self.scene.is_some() || self.staged.is_some() {
            tracing::debug!(
                "Cancelling scene state: {} visible, {} pending, {} animating",
                self.reveal.visible_count(),
                self.reveal.pending_count(),
                self.entries.active_count()
            );
        }
        self.staged = None;
        self.scene = None;
        self.reveal.clear();
        self.entries.clear();
        self.is_generating = false;
    }

    /// Drop the scene and the prompt
    pub fn clear_scene(&mut self) {
        self.cancel();
        self.prompt.clear();
    }

    /// A scene is fully revealed and every entry animation has completed
    pub fn is_settled(&self) -> bool {
        self.scene.is_some()
            && self.staged.is_none()
            && !self.is_generating
            && self.reveal.is_complete()
            && self.entries.all_settled()
    }

    /// Visible nodes in reveal order, with their full paths
    pub fn visible_nodes(&self) -> Vec<(&str, &SceneNode)> {
        let Some(scene) = &self.scene else {
            return Vec::new();
        };
        self.reveal
            .visible()
            .filter_map(|path| scene.find_path(path).map(|node| (path, node)))
            .collect()
    }

    pub fn is_visible(&self, path: &str) -> bool {
        self.reveal.is_visible(path)
    }

    /// Current entry pose of a visible node
    pub fn pose(&self, path: &str) -> Option<Pose> {
        self.entries.pose(path)
    }

    pub fn reveal_phase(&self) -> RevealPhase {
        self.reveal.phase()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn scene(&self) -> Option<&Arc<SceneGraph>> {
        self.scene.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_generating(&self) -> bool {
        self.is_generating
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn reveal(&self) -> &RevealScheduler {
        &self.reveal
    }

    pub fn entries(&self) -> &EntryTracker {
        &self.entries
    }

    pub fn characters(&self) -> &CharacterStore {
        &self.characters
    }

    pub fn characters_mut(&mut self) -> &mut CharacterStore {
        &mut self.characters
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
