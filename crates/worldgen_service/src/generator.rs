//! Scene generators
//!
//! A [`Generator`] maps a prompt to raw scene JSON. Nothing about that
//! output is trusted; callers validate it before use.
//!
//! [`MockGenerator`] stands in for a model-backed generator. It lowercases
//! the prompt, picks a [`SceneTheme`] by keyword and returns that theme's
//! canned scene. [`ReplayGenerator`] replays a recorded model completion,
//! decoded with [`parse_output`].

use crate::error::{GenerateError, Result};
use serde_json::{json, Value};
use std::future::Future;

/// Produces untrusted scene JSON from a prompt
pub trait Generator: Send + Sync {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<Value>> + Send;
}

/// Keyword-selected scene family
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SceneTheme {
    Coastal,
    Village,
    Mountain,
    Forest,
    City,
    Default,
}

impl SceneTheme {
    /// Checked in order; the first theme with a matching keyword wins
    pub const MATCH_ORDER: [SceneTheme; 5] = [
        SceneTheme::Coastal,
        SceneTheme::Village,
        SceneTheme::Mountain,
        SceneTheme::Forest,
        SceneTheme::City,
    ];

    /// Pick a theme from the words in `prompt` (case-insensitive)
    pub fn from_prompt(prompt: &str) -> SceneTheme {
        let prompt = prompt.to_lowercase();
        Self::MATCH_ORDER
            .into_iter()
            .find(|theme| theme.keywords().iter().any(|kw| prompt.contains(kw)))
            .unwrap_or(SceneTheme::Default)
    }

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            SceneTheme::Coastal => &["coastal", "beach", "ocean"],
            SceneTheme::Village => &["village", "town"],
            SceneTheme::Mountain => &["mountain", "hill"],
            SceneTheme::Forest => &["forest", "woods"],
            SceneTheme::City => &["city", "urban"],
            SceneTheme::Default => &[],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SceneTheme::Coastal => "coastal",
            SceneTheme::Village => "village",
            SceneTheme::Mountain => "mountain",
            SceneTheme::Forest => "forest",
            SceneTheme::City => "city",
            SceneTheme::Default => "default",
        }
    }

    /// The canned raw scene for this theme
    pub fn scene(self) -> Value {
        match self {
            SceneTheme::Coastal => coastal_scene(),
            SceneTheme::Village => village_scene(),
            SceneTheme::Mountain => mountain_scene(),
            SceneTheme::Forest => forest_scene(),
            SceneTheme::City => city_scene(),
            SceneTheme::Default => default_scene(),
        }
    }
}

/// Keyword-matched canned scenes
#[derive(Clone, Copy, Debug, Default)]
pub struct MockGenerator;

impl MockGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Generator for MockGenerator {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<Value>> + Send {
        let theme = SceneTheme::from_prompt(prompt);
        tracing::info!("Generating world from prompt {:?} (mock, {} theme)", prompt, theme.as_str());
        std::future::ready(Ok(theme.scene()))
    }
}

/// Decode a model completion into scene JSON
///
/// Completions often arrive wrapped in a markdown code fence; the fence is
/// stripped before parsing. Text that is still not JSON is
/// [`GenerateError::Malformed`].
pub fn parse_output(text: &str) -> Result<Value> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed);

    serde_json::from_str(body).map_err(|err| {
        tracing::warn!("Generator output is not JSON: {}", err);
        GenerateError::Malformed(err.to_string())
    })
}

/// Answers every prompt with the same recorded completion text
#[derive(Clone, Debug)]
pub struct ReplayGenerator {
    text: String,
}

impl ReplayGenerator {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Generator for ReplayGenerator {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<Value>> + Send {
        tracing::info!("Replaying recorded completion for prompt {:?}", prompt);
        std::future::ready(parse_output(&self.text))
    }
}

// ============================================================================
// Canned scenes
// ============================================================================

fn node(id: &str, kind: &str, position: [f64; 3], scale: [f64; 3], color: [f64; 3]) -> Value {
    json!({
        "id": id,
        "type": kind,
        "position": position,
        "scale": scale,
        "color": color,
    })
}

fn with_children(mut node: Value, children: Vec<Value>) -> Value {
    node["children"] = Value::Array(children);
    node
}

fn world(children: Vec<Value>) -> Value {
    json!({ "id": "world", "children": children })
}

fn terrain(color: [f64; 3]) -> Value {
    with_children(
        node("terrain", "box", [0.0, -0.5, 0.0], [100.0, 1.0, 100.0], color),
        vec![],
    )
}

fn default_scene() -> Value {
    world(vec![
        terrain([0.3, 0.6, 0.2]),
        with_children(
            node("central_building", "box", [0.0, 2.0, 0.0], [6.0, 4.0, 6.0], [0.8, 0.8, 0.8]),
            vec![node("roof", "cone", [0.0, 3.0, 0.0], [6.0, 2.0, 6.0], [0.7, 0.3, 0.3])],
        ),
        node("tree_1", "tree", [-10.0, 0.0, 5.0], [1.0, 3.0, 1.0], [0.1, 0.5, 0.1]),
        node("tree_2", "tree", [-12.0, 0.0, 8.0], [1.2, 3.5, 1.2], [0.1, 0.6, 0.1]),
        node("tree_3", "tree", [-8.0, 0.0, 10.0], [0.8, 2.5, 0.8], [0.1, 0.5, 0.1]),
        node("sphere_landmark", "sphere", [12.0, 2.0, -5.0], [4.0, 4.0, 4.0], [0.7, 0.7, 0.9]),
    ])
}

fn village_scene() -> Value {
    world(vec![
        terrain([0.4, 0.6, 0.3]),
        node("house_1", "house", [-8.0, 0.0, -5.0], [2.0, 2.0, 2.0], [0.9, 0.8, 0.7]),
        node("house_2", "house", [-12.0, 0.0, 0.0], [2.2, 2.0, 2.2], [0.85, 0.8, 0.7]),
        node("house_3", "house", [-5.0, 0.0, 4.0], [2.0, 2.0, 2.0], [0.9, 0.85, 0.8]),
        node("house_4", "house", [5.0, 0.0, -8.0], [2.5, 2.2, 2.5], [0.8, 0.7, 0.6]),
        node("large_house", "house", [8.0, 0.0, 5.0], [3.0, 2.5, 3.0], [0.7, 0.65, 0.6]),
        node("plaza", "cylinder", [0.0, -0.4, 0.0], [8.0, 0.2, 8.0], [0.7, 0.7, 0.7]),
        node("tree_group_1", "tree", [-15.0, 0.0, -15.0], [1.5, 3.0, 1.5], [0.1, 0.5, 0.1]),
        node("tree_group_2", "tree", [15.0, 0.0, 15.0], [1.3, 2.8, 1.3], [0.1, 0.55, 0.1]),
        node("tree_group_3", "tree", [18.0, 0.0, -10.0], [1.2, 2.5, 1.2], [0.15, 0.6, 0.15]),
        node("well", "cylinder", [0.0, 0.5, 0.0], [1.5, 1.0, 1.5], [0.6, 0.6, 0.6]),
    ])
}

fn mountain_scene() -> Value {
    world(vec![
        terrain([0.4, 0.6, 0.3]),
        node("mountain_main", "cone", [0.0, 10.0, -20.0], [20.0, 20.0, 20.0], [0.5, 0.5, 0.5]),
        node("mountain_peak_1", "cone", [-15.0, 8.0, -15.0], [10.0, 16.0, 10.0], [0.55, 0.5, 0.45]),
        node("mountain_peak_2", "cone", [20.0, 6.0, -25.0], [12.0, 12.0, 12.0], [0.6, 0.55, 0.5]),
        node("rock_1", "box", [5.0, 1.0, -5.0], [3.0, 2.0, 2.0], [0.5, 0.45, 0.4]),
        node("rock_2", "box", [-8.0, 1.0, 2.0], [2.0, 1.5, 3.0], [0.45, 0.4, 0.35]),
        node("rock_3", "box", [12.0, 1.5, 8.0], [4.0, 3.0, 2.5], [0.55, 0.5, 0.45]),
        node("tree_valley_1", "tree", [-5.0, 0.0, 10.0], [1.0, 2.0, 1.0], [0.1, 0.4, 0.1]),
        node("tree_valley_2", "tree", [0.0, 0.0, 8.0], [1.2, 2.2, 1.2], [0.1, 0.45, 0.1]),
        node("tree_valley_3", "tree", [6.0, 0.0, 12.0], [1.1, 2.3, 1.1], [0.15, 0.5, 0.15]),
    ])
}

fn coastal_scene() -> Value {
    world(vec![
        with_children(
            node("terrain", "box", [0.0, -0.5, -20.0], [100.0, 1.0, 60.0], [0.4, 0.6, 0.3]),
            vec![],
        ),
        with_children(
            node("water", "box", [0.0, -0.8, 30.0], [100.0, 0.4, 40.0], [0.1, 0.4, 0.8]),
            vec![],
        ),
        with_children(
            node("beach", "box", [0.0, -0.45, 0.0], [100.0, 0.1, 10.0], [0.9, 0.8, 0.6]),
            vec![],
        ),
        with_children(
            node("lighthouse_base", "cylinder", [20.0, 2.0, -5.0], [3.0, 4.0, 3.0], [0.9, 0.9, 0.9]),
            vec![node("lighthouse_top", "cylinder", [0.0, 3.0, 0.0], [2.0, 2.0, 2.0], [0.9, 0.2, 0.2])],
        ),
        node("beach_house_1", "house", [-15.0, 0.0, -8.0], [2.5, 2.0, 2.5], [0.9, 0.85, 0.8]),
        node("beach_house_2", "house", [-8.0, 0.0, -10.0], [2.2, 2.0, 2.2], [0.85, 0.8, 0.75]),
        node("beach_house_3", "house", [0.0, 0.0, -12.0], [2.5, 2.0, 2.5], [0.8, 0.75, 0.7]),
        node("palm_1", "tree", [-10.0, 0.0, -2.0], [1.0, 3.0, 1.0], [0.2, 0.6, 0.3]),
        node("palm_2", "tree", [10.0, 0.0, -3.0], [1.2, 3.5, 1.2], [0.2, 0.65, 0.3]),
        node("boat_1", "box", [5.0, 0.0, 8.0], [2.0, 1.0, 4.0], [0.6, 0.5, 0.4]),
        node("boat_2", "box", [-12.0, 0.0, 12.0], [2.5, 1.2, 5.0], [0.7, 0.6, 0.5]),
    ])
}

fn forest_scene() -> Value {
    // ([x, z], [width, height], [red/blue, green])
    const TREES: [([f64; 2], [f64; 2], [f64; 2]); 18] = [
        ([-20.0, -15.0], [1.5, 4.0], [0.1, 0.4]),
        ([-15.0, -10.0], [1.7, 4.5], [0.1, 0.45]),
        ([-12.0, -18.0], [1.4, 3.8], [0.15, 0.5]),
        ([-8.0, -5.0], [1.6, 4.2], [0.1, 0.4]),
        ([-5.0, -15.0], [1.3, 3.6], [0.1, 0.45]),
        ([5.0, -20.0], [1.8, 4.8], [0.1, 0.4]),
        ([10.0, -15.0], [1.5, 4.0], [0.1, 0.5]),
        ([15.0, -10.0], [1.6, 4.3], [0.15, 0.45]),
        ([20.0, -5.0], [1.4, 3.9], [0.1, 0.4]),
        ([-18.0, 0.0], [1.7, 4.5], [0.1, 0.5]),
        ([-12.0, 5.0], [1.5, 4.0], [0.15, 0.45]),
        ([-20.0, 10.0], [1.6, 4.2], [0.1, 0.4]),
        ([-15.0, 15.0], [1.4, 3.8], [0.1, 0.5]),
        ([-5.0, 20.0], [1.8, 4.6], [0.15, 0.45]),
        ([5.0, 15.0], [1.5, 4.0], [0.1, 0.5]),
        ([10.0, 20.0], [1.7, 4.4], [0.1, 0.4]),
        ([15.0, 10.0], [1.6, 4.2], [0.15, 0.5]),
        ([20.0, 5.0], [1.4, 3.8], [0.1, 0.45]),
    ];

    let mut children = vec![terrain([0.3, 0.5, 0.2])];
    for (i, ([x, z], [width, height], [tint, green])) in TREES.into_iter().enumerate() {
        children.push(node(
            &format!("tree_{}", i + 1),
            "tree",
            [x, 0.0, z],
            [width, height, width],
            [tint, green, tint],
        ));
    }
    children.push(node("clearing", "cylinder", [0.0, -0.4, 0.0], [10.0, 0.2, 10.0], [0.4, 0.6, 0.3]));
    children.push(node("cabin", "house", [0.0, 0.0, 0.0], [2.0, 2.0, 2.0], [0.6, 0.4, 0.2]));
    world(children)
}

fn city_scene() -> Value {
    // ([x, z], height, color); buildings stand on the ground
    const BUILDINGS: [([f64; 2], f64, [f64; 3]); 8] = [
        ([-15.0, -15.0], 12.0, [0.6, 0.6, 0.7]),
        ([-15.0, 0.0], 8.0, [0.65, 0.65, 0.7]),
        ([-15.0, 15.0], 14.0, [0.7, 0.7, 0.8]),
        ([0.0, -15.0], 10.0, [0.75, 0.75, 0.85]),
        ([0.0, 15.0], 16.0, [0.8, 0.8, 0.9]),
        ([15.0, -15.0], 18.0, [0.7, 0.7, 0.8]),
        ([15.0, 0.0], 12.0, [0.75, 0.75, 0.85]),
        ([15.0, 15.0], 14.0, [0.8, 0.8, 0.9]),
    ];
    const CARS: [([f64; 2], [f64; 3]); 4] = [
        ([8.0, 0.0], [0.8, 0.2, 0.2]),
        ([-8.0, 0.0], [0.2, 0.2, 0.8]),
        ([0.0, 8.0], [0.8, 0.8, 0.2]),
        ([0.0, -8.0], [0.2, 0.8, 0.2]),
    ];

    let mut children = vec![
        terrain([0.5, 0.5, 0.5]),
        with_children(
            node("skyscraper_center", "box", [0.0, 10.0, 0.0], [8.0, 20.0, 8.0], [0.7, 0.7, 0.8]),
            vec![],
        ),
    ];
    for (i, ([x, z], height, color)) in BUILDINGS.into_iter().enumerate() {
        children.push(node(
            &format!("building_{}", i + 1),
            "box",
            [x, height / 2.0, z],
            [6.0, height, 6.0],
            color,
        ));
    }
    children.push(node("road_x", "box", [0.0, -0.4, 0.0], [50.0, 0.2, 4.0], [0.2, 0.2, 0.2]));
    children.push(node("road_z", "box", [0.0, -0.4, 0.0], [4.0, 0.2, 50.0], [0.2, 0.2, 0.2]));
    for (i, ([x, z], color)) in CARS.into_iter().enumerate() {
        children.push(node(&format!("car_{}", i + 1), "car", [x, 0.0, z], [1.0, 1.0, 1.0], color));
    }
    world(children)
}
