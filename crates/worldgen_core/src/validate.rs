//! Scene validation and normalization
//!
//! Generator output is untrusted: it may come from a keyword-matched mock or
//! from a model that hallucinates structure. [`validate`] is total. Whatever
//! JSON it is handed, it returns a [`SceneGraph`] in which
//!
//! - every node has one of the 12 known kinds (unknown tags become `box`),
//! - `position`, `scale` and `color` are finite 3-vectors, colors in `[0, 1]`,
//! - no node sits deeper than [`MAX_DEPTH`] below the root's children,
//! - sibling ids are unique and free of the path separator, so every node
//!   has its own full path,
//! - the root has at least one child (a fallback terrain slab if need be).
//!
//! Fields are defaulted individually rather than rejecting whole nodes, so
//! partially good content survives. Only a node missing its id, its type or
//! a position array is dropped, together with its subtree.

use crate::graph::{SceneGraph, SceneNode, PATH_SEPARATOR};
use crate::kind::NodeKind;
use crate::math::{Color, Vec3};
use rustc_hash::FxHashSet;
use serde_json::{Map, Value};

/// Deepest retained depth; top-level nodes are depth 0
pub const MAX_DEPTH: usize = 10;

const DEFAULT_ROOT_ID: &str = "world";
const TERRAIN_ID: &str = "terrain";

/// What the validator had to repair
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Nodes kept in the output
    pub accepted_nodes: usize,
    /// Nodes dropped for missing id, type or position (subtrees included)
    pub dropped_nodes: usize,
    /// Nodes dropped for exceeding [`MAX_DEPTH`]
    pub depth_pruned: usize,
    /// Unknown `type` tags coerced to `box`
    pub coerced_types: usize,
    /// Vectors that were present but replaced or partially defaulted
    pub defaulted_vectors: usize,
    /// Colors with at least one component clamped into range
    pub clamped_colors: usize,
    /// Ids rewritten to drop the path separator or to break a sibling clash
    pub renamed_ids: usize,
    /// The root was not an object with an id and a children array
    pub malformed_root: bool,
    /// The fallback terrain node was appended
    pub fallback_terrain: bool,
}

impl ValidationReport {
    /// True when the input already satisfied every invariant
    pub fn is_clean(&self) -> bool {
        self.dropped_nodes == 0
            && self.depth_pruned == 0
            && self.coerced_types == 0
            && self.defaulted_vectors == 0
            && self.clamped_colors == 0
            && self.renamed_ids == 0
            && !self.malformed_root
            && !self.fallback_terrain
    }
}

/// The terrain slab used when a scene would otherwise be empty
pub fn fallback_terrain() -> SceneNode {
    SceneNode::new(TERRAIN_ID, NodeKind::BOX, Vec3::new(0.0, -0.5, 0.0))
        .with_scale(Vec3::new(100.0, 1.0, 100.0))
        .with_color(Color::rgb(0.3, 0.6, 0.2))
}

/// Normalize untrusted JSON into a valid scene graph
pub fn validate(raw: &Value) -> SceneGraph {
    validate_with_report(raw).0
}

/// Parse and normalize a JSON document; unparseable text yields the fallback graph
pub fn validate_str(json: &str) -> SceneGraph {
    match serde_json::from_str::<Value>(json) {
        Ok(raw) => validate(&raw),
        Err(err) => {
            tracing::warn!("Scene JSON did not parse, using fallback scene: {}", err);
            validate(&Value::Null)
        }
    }
}

/// Normalize untrusted JSON and report every repair made along the way
pub fn validate_with_report(raw: &Value) -> (SceneGraph, ValidationReport) {
    let mut report = ValidationReport::default();

    let root = raw.as_object().and_then(|obj| {
        let id = obj.get("id").and_then(id_like)?;
        let children = obj.get("children")?.as_array()?;
        Some((id, children))
    });

    let (id, mut children) = match root {
        Some((id, nodes)) => {
            let children = validate_siblings(nodes, 0, &mut report);
            (id, children)
        }
        None => {
            report.malformed_root = true;
            (DEFAULT_ROOT_ID.to_string(), Vec::new())
        }
    };

    if children.is_empty() {
        children.push(fallback_terrain());
        report.fallback_terrain = true;
    }

    if report.is_clean() {
        tracing::trace!("Scene '{}' validated clean ({} nodes)", id, report.accepted_nodes);
    } else {
        tracing::debug!(
            scene = %id,
            accepted = report.accepted_nodes,
            dropped = report.dropped_nodes,
            depth_pruned = report.depth_pruned,
            coerced_types = report.coerced_types,
            defaulted_vectors = report.defaulted_vectors,
            clamped_colors = report.clamped_colors,
            renamed_ids = report.renamed_ids,
            malformed_root = report.malformed_root,
            fallback_terrain = report.fallback_terrain,
            "Scene repaired during validation"
        );
    }

    (SceneGraph { id, children }, report)
}

fn validate_siblings(nodes: &[Value], depth: usize, report: &mut ValidationReport) -> Vec<SceneNode> {
    let mut siblings: Vec<SceneNode> = nodes
        .iter()
        .filter_map(|node| validate_node(node, depth, report))
        .collect();
    unique_ids(&mut siblings, report);
    siblings
}

/// Later duplicates get the first free `_2`, `_3`, ... suffix
fn unique_ids(siblings: &mut [SceneNode], report: &mut ValidationReport) {
    let mut taken: FxHashSet<String> = FxHashSet::default();
    for node in siblings.iter_mut() {
        if taken.contains(&node.id) {
            let base = node.id.clone();
            let mut n = 2;
            while taken.contains(&format!("{}_{}", base, n)) {
                n += 1;
            }
            node.id = format!("{}_{}", base, n);
            report.renamed_ids += 1;
        }
        taken.insert(node.id.clone());
    }
}

fn validate_node(value: &Value, depth: usize, report: &mut ValidationReport) -> Option<SceneNode> {
    if depth > MAX_DEPTH {
        report.depth_pruned += 1;
        return None;
    }

    let Some(obj) = value.as_object() else {
        report.dropped_nodes += 1;
        return None;
    };

    let (Some(id), Some(kind_value), Some(position)) = (
        obj.get("id").and_then(id_like),
        obj.get("type").filter(|v| is_present(v)),
        obj.get("position").and_then(Value::as_array),
    ) else {
        report.dropped_nodes += 1;
        return None;
    };

    let id = if id.contains(PATH_SEPARATOR) {
        report.renamed_ids += 1;
        id.replace(PATH_SEPARATOR, "_")
    } else {
        id
    };

    let kind = match kind_value.as_str().and_then(NodeKind::parse) {
        Some(kind) => kind,
        None => {
            report.coerced_types += 1;
            NodeKind::BOX
        }
    };

    // Wrong length resets the whole position; bad elements default one by one.
    let position = if position.len() == 3 {
        coerce_elements(position, 0.0, report)
    } else {
        report.defaulted_vectors += 1;
        Vec3::ZERO
    };

    let scale = coerce_optional(obj, "scale", 1.0, report);

    let raw_color = coerce_optional(obj, "color", 1.0, report);
    let color = Color::clamped(raw_color.x, raw_color.y, raw_color.z);
    if color.to_array() != raw_color.to_array() {
        report.clamped_colors += 1;
    }

    let children = obj
        .get("children")
        .and_then(Value::as_array)
        .map(|nodes| validate_siblings(nodes, depth + 1, report))
        .unwrap_or_default();

    report.accepted_nodes += 1;

    Some(SceneNode {
        id,
        kind,
        position,
        scale,
        color,
        children,
    })
}

/// A 3-vector field that may be absent; anything but a 3-element array is
/// replaced with `fallback` on every axis.
fn coerce_optional(
    obj: &Map<String, Value>,
    key: &str,
    fallback: f32,
    report: &mut ValidationReport,
) -> Vec3 {
    match obj.get(key) {
        None | Some(Value::Null) => Vec3::splat(fallback),
        Some(Value::Array(values)) if values.len() == 3 => {
            coerce_elements(values, fallback, report)
        }
        Some(_) => {
            report.defaulted_vectors += 1;
            Vec3::splat(fallback)
        }
    }
}

fn coerce_elements(values: &[Value], fallback: f32, report: &mut ValidationReport) -> Vec3 {
    let mut defaulted = false;
    let mut axis = |value: &Value| {
        coerce_number(value).unwrap_or_else(|| {
            defaulted = true;
            fallback
        })
    };
    let v = Vec3::new(axis(&values[0]), axis(&values[1]), axis(&values[2]));
    if defaulted {
        report.defaulted_vectors += 1;
    }
    v
}

/// Numbers and numeric strings that stay finite as `f32`
fn coerce_number(value: &Value) -> Option<f32> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }? as f32;
    n.is_finite().then_some(n)
}

/// Ids may be strings, numbers or booleans; only null, missing and empty
/// strings are rejected, so `"0"` and `0` are valid ids.
fn id_like(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
