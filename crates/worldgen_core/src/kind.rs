//! Node kinds
//!
//! Every scene node is exactly one of 12 tags: 5 geometric primitives drawn
//! directly, or 7 prefabs that the rendering side composes from primitives.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Basic geometric shape
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveShape {
    Box,
    Sphere,
    Cylinder,
    Cone,
    Plane,
}

impl PrimitiveShape {
    pub const ALL: [PrimitiveShape; 5] = [
        PrimitiveShape::Box,
        PrimitiveShape::Sphere,
        PrimitiveShape::Cylinder,
        PrimitiveShape::Cone,
        PrimitiveShape::Plane,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveShape::Box => "box",
            PrimitiveShape::Sphere => "sphere",
            PrimitiveShape::Cylinder => "cylinder",
            PrimitiveShape::Cone => "cone",
            PrimitiveShape::Plane => "plane",
        }
    }
}

/// Composite named object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrefabKind {
    Chair,
    Table,
    Tree,
    Lamp,
    House,
    Car,
    Bench,
}

impl PrefabKind {
    pub const ALL: [PrefabKind; 7] = [
        PrefabKind::Chair,
        PrefabKind::Table,
        PrefabKind::Tree,
        PrefabKind::Lamp,
        PrefabKind::House,
        PrefabKind::Car,
        PrefabKind::Bench,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PrefabKind::Chair => "chair",
            PrefabKind::Table => "table",
            PrefabKind::Tree => "tree",
            PrefabKind::Lamp => "lamp",
            PrefabKind::House => "house",
            PrefabKind::Car => "car",
            PrefabKind::Bench => "bench",
        }
    }
}

/// The closed `type` set of a scene node
///
/// Serializes as the bare lowercase tag. Strict deserialization rejects
/// unknown tags; the validator is the tolerant path that coerces them to
/// [`NodeKind::BOX`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum NodeKind {
    Primitive(PrimitiveShape),
    Prefab(PrefabKind),
}

impl NodeKind {
    /// The fallback kind for anything unrecognized
    pub const BOX: NodeKind = NodeKind::Primitive(PrimitiveShape::Box);

    /// Every valid tag, primitives first
    pub const ALL: [NodeKind; 12] = [
        NodeKind::Primitive(PrimitiveShape::Box),
        NodeKind::Primitive(PrimitiveShape::Sphere),
        NodeKind::Primitive(PrimitiveShape::Cylinder),
        NodeKind::Primitive(PrimitiveShape::Cone),
        NodeKind::Primitive(PrimitiveShape::Plane),
        NodeKind::Prefab(PrefabKind::Chair),
        NodeKind::Prefab(PrefabKind::Table),
        NodeKind::Prefab(PrefabKind::Tree),
        NodeKind::Prefab(PrefabKind::Lamp),
        NodeKind::Prefab(PrefabKind::House),
        NodeKind::Prefab(PrefabKind::Car),
        NodeKind::Prefab(PrefabKind::Bench),
    ];

    /// Parse an exact tag
    pub fn parse(tag: &str) -> Option<NodeKind> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == tag)
    }

    /// Parse a tag, coercing anything unrecognized to `box`
    pub fn from_tag(tag: &str) -> NodeKind {
        Self::parse(tag).unwrap_or(Self::BOX)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Primitive(shape) => shape.as_str(),
            NodeKind::Prefab(prefab) => prefab.as_str(),
        }
    }

    pub fn is_prefab(self) -> bool {
        matches!(self, NodeKind::Prefab(_))
    }

    pub fn is_primitive(self) -> bool {
        matches!(self, NodeKind::Primitive(_))
    }
}

impl Default for NodeKind {
    fn default() -> Self {
        Self::BOX
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for NodeKind {
    type Error = String;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        NodeKind::parse(&tag).ok_or_else(|| format!("unknown node type '{}'", tag))
    }
}

impl From<NodeKind> for &'static str {
    fn from(kind: NodeKind) -> Self {
        kind.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_tags_round_trip() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(NodeKind::ALL.iter().filter(|k| k.is_prefab()).count(), 7);
        assert_eq!(NodeKind::ALL.iter().filter(|k| k.is_primitive()).count(), 5);
    }

    #[test]
    fn test_unknown_tag_falls_back_to_box() {
        assert_eq!(NodeKind::from_tag("spaceship"), NodeKind::BOX);
        assert_eq!(NodeKind::from_tag("Tree"), NodeKind::BOX);
        assert_eq!(NodeKind::from_tag("tree"), NodeKind::Prefab(PrefabKind::Tree));
    }

    #[test]
    fn test_strict_serde() {
        let kind: NodeKind = serde_json::from_str("\"lamp\"").unwrap();
        assert_eq!(kind, NodeKind::Prefab(PrefabKind::Lamp));
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"lamp\"");

        assert!(serde_json::from_str::<NodeKind>("\"spaceship\"").is_err());
    }
}
