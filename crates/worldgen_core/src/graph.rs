//! Scene graph data model
//!
//! A `SceneGraph` is a synthetic root holding top-level `SceneNode`s. A node's
//! `id` is only unique among its siblings; its global identity is the full
//! path, the dot-joined chain of ancestor ids (`"house_1.roof_1"`).

use crate::error::{GraphError, Result};
use crate::kind::NodeKind;
use crate::math::{Color, Vec3};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Separator between ids in a full node path
pub const PATH_SEPARATOR: char = '.';

/// Join a parent path and a child id into the child's full path
pub fn join_path(parent: Option<&str>, id: &str) -> String {
    match parent {
        Some(parent) => format!("{}{}{}", parent, PATH_SEPARATOR, id),
        None => id.to_string(),
    }
}

/// A node in the scene tree
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub position: Vec3,
    #[serde(default = "default_scale")]
    pub scale: Vec3,
    #[serde(default)]
    pub color: Color,
    /// Omitted from JSON when empty, so "has a children key" means
    /// "has at least one child".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SceneNode>,
}

fn default_scale() -> Vec3 {
    Vec3::ONE
}

impl SceneNode {
    /// Create a leaf node with unit scale and white color
    pub fn new(id: impl Into<String>, kind: NodeKind, position: Vec3) -> Self {
        Self {
            id: id.into(),
            kind,
            position,
            scale: Vec3::ONE,
            color: Color::WHITE,
            children: Vec::new(),
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Number of nodes in this subtree, including self
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(SceneNode::subtree_len).sum::<usize>()
    }

    fn apply(&mut self, update: &NodeUpdate) {
        if let Some(kind) = update.kind {
            self.kind = kind;
        }
        if let Some(position) = update.position {
            self.position = position;
        }
        if let Some(scale) = update.scale {
            self.scale = scale;
        }
        if let Some(color) = update.color {
            self.color = color;
        }
    }
}

/// Partial node patch; `None` fields are left untouched
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeUpdate {
    pub kind: Option<NodeKind>,
    pub position: Option<Vec3>,
    pub scale: Option<Vec3>,
    pub color: Option<Color>,
}

impl NodeUpdate {
    pub fn position(position: Vec3) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn color(color: Color) -> Self {
        Self {
            color: Some(color),
            ..Default::default()
        }
    }
}

/// Root of a generated world
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneGraph {
    pub id: String,
    #[serde(default)]
    pub children: Vec<SceneNode>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::empty()
    }
}

impl SceneGraph {
    /// The empty `"world"` graph
    pub fn empty() -> Self {
        Self {
            id: "world".to_string(),
            children: Vec::new(),
        }
    }

    /// Append a top-level node
    pub fn add_node(&mut self, node: SceneNode) {
        self.children.push(node);
    }

    /// Builder form of [`add_node`](Self::add_node)
    pub fn with_node(mut self, node: SceneNode) -> Self {
        self.add_node(node);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Total node count, excluding the synthetic root
    pub fn node_count(&self) -> usize {
        self.children.iter().map(SceneNode::subtree_len).sum()
    }

    /// Deepest node depth (top-level nodes are depth 0), `None` when empty
    pub fn max_depth(&self) -> Option<usize> {
        let mut deepest = None;
        self.walk(|_, _, depth| {
            deepest = Some(deepest.map_or(depth, |d: usize| d.max(depth)));
        });
        deepest
    }

    /// Visit every node in pre-order with its full path and depth
    ///
    /// Parents are visited before their children, children in array order.
    pub fn walk<F>(&self, mut visitor: F)
    where
        F: FnMut(&str, &SceneNode, usize),
    {
        fn visit<F>(nodes: &[SceneNode], parent: Option<&str>, depth: usize, visitor: &mut F)
        where
            F: FnMut(&str, &SceneNode, usize),
        {
            for node in nodes {
                let path = join_path(parent, &node.id);
                visitor(&path, node, depth);
                visit(&node.children, Some(&path), depth + 1, visitor);
            }
        }

        visit(&self.children, None, 0, &mut visitor);
    }

    /// Every full path in pre-order
    pub fn paths(&self) -> Vec<String> {
        let mut paths = Vec::with_capacity(self.node_count());
        self.walk(|path, _, _| paths.push(path.to_string()));
        paths
    }

    /// First node in pre-order whose bare id matches
    pub fn find_by_id(&self, id: &str) -> Option<&SceneNode> {
        fn search<'a>(nodes: &'a [SceneNode], id: &str) -> Option<&'a SceneNode> {
            for node in nodes {
                if node.id == id {
                    return Some(node);
                }
                if let Some(found) = search(&node.children, id) {
                    return Some(found);
                }
            }
            None
        }

        search(&self.children, id)
    }

    /// Resolve a full dotted path
    pub fn find_path(&self, path: &str) -> Option<&SceneNode> {
        let mut segments = path.split(PATH_SEPARATOR);
        let first = segments.next()?;
        let mut node = self.children.iter().find(|n| n.id == first)?;
        for segment in segments {
            node = node.children.iter().find(|n| n.id == segment)?;
        }
        Some(node)
    }

    fn find_path_mut(&mut self, path: &str) -> Option<&mut SceneNode> {
        let mut segments = path.split(PATH_SEPARATOR);
        let first = segments.next()?;
        let mut node = self.children.iter_mut().find(|n| n.id == first)?;
        for segment in segments {
            node = node.children.iter_mut().find(|n| n.id == segment)?;
        }
        Some(node)
    }

    /// Patch every node whose bare id matches, returning how many were patched
    ///
    /// A patched node's own subtree is not searched further; sibling
    /// branches are.
    pub fn update_node(&mut self, id: &str, update: &NodeUpdate) -> usize {
        fn update_in(nodes: &mut [SceneNode], id: &str, update: &NodeUpdate) -> usize {
            let mut count = 0;
            for node in nodes {
                if node.id == id {
                    node.apply(update);
                    count += 1;
                } else {
                    count += update_in(&mut node.children, id, update);
                }
            }
            count
        }

        update_in(&mut self.children, id, update)
    }

    /// Patch the node at an exact full path
    pub fn update_at_path(&mut self, path: &str, update: &NodeUpdate) -> Result<()> {
        let node = self
            .find_path_mut(path)
            .ok_or_else(|| GraphError::PathNotFound(path.to_string()))?;
        node.apply(update);
        Ok(())
    }

    /// Insert `node` as the last child of `parent_path` (or at top level)
    ///
    /// Sibling ids must stay unique since they form full paths.
    pub fn insert_at(&mut self, parent_path: Option<&str>, node: SceneNode) -> Result<()> {
        if node.id.is_empty() {
            return Err(GraphError::EmptyId);
        }
        if node.id.contains(PATH_SEPARATOR) {
            return Err(GraphError::SeparatorInId(node.id));
        }

        let siblings = match parent_path {
            Some(path) => {
                &mut self
                    .find_path_mut(path)
                    .ok_or_else(|| GraphError::PathNotFound(path.to_string()))?
                    .children
            }
            None => &mut self.children,
        };

        let taken: FxHashSet<&str> = siblings.iter().map(|n| n.id.as_str()).collect();
        if taken.contains(node.id.as_str()) {
            return Err(GraphError::DuplicateId {
                parent: parent_path.unwrap_or("<root>").to_string(),
                id: node.id,
            });
        }

        siblings.push(node);
        Ok(())
    }
}
