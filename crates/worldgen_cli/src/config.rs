//! `worldgen.toml` handling
//!
//! Every field is optional; a missing file means all defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use worldgen_runtime::SessionConfig;

pub const CONFIG_FILE: &str = "worldgen.toml";

// =============================================================================
// worldgen.toml
// =============================================================================

#[derive(Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct WorldgenConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
}

/// Frame loop settings for `worldgen preview`
#[derive(Debug, PartialEq, Deserialize, Serialize)]
pub struct PreviewConfig {
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Give up after this many frames even if the scene has not settled
    #[serde(default = "default_max_frames")]
    pub max_frames: u64,
}

fn default_fps() -> u32 {
    60
}

fn default_max_frames() -> u64 {
    3600
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            max_frames: default_max_frames(),
        }
    }
}

impl PreviewConfig {
    /// Duration of one frame; a zero fps is treated as 1, and the result is
    /// never shorter than a nanosecond
    pub fn frame_duration(&self) -> Duration {
        (Duration::from_secs(1) / self.fps.max(1)).max(Duration::from_nanos(1))
    }
}

impl WorldgenConfig {
    /// Load `path`, or the defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No {} found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize worldgen config")
    }
}
