//! Worldgen Core
//!
//! The data model behind generated worlds:
//!
//! - **Math**: `Vec3` and `Color`, serialized as 3-element JSON arrays
//! - **Node kinds**: the closed set of 5 primitive and 7 prefab tags
//! - **Scene graph**: `SceneNode` trees under a synthetic `SceneGraph` root,
//!   with dotted full paths as global node identity
//! - **Validation**: a total, tolerant normalizer that turns any untrusted
//!   JSON into a graph satisfying every structural invariant
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use worldgen_core::validate;
//!
//! let raw = json!({
//!     "id": "world",
//!     "children": [
//!         { "id": "house_1", "type": "house", "position": [0, 0, 0],
//!           "children": [{ "id": "roof_1", "type": "cone", "position": [0, 3, 0] }] }
//!     ]
//! });
//!
//! let scene = validate(&raw);
//! assert_eq!(scene.paths(), vec!["house_1", "house_1.roof_1"]);
//! ```

pub mod error;
pub mod graph;
pub mod kind;
pub mod math;
pub mod prefab;
pub mod validate;

pub use error::{GraphError, Result};
pub use graph::{join_path, NodeUpdate, SceneGraph, SceneNode, PATH_SEPARATOR};
pub use kind::{NodeKind, PrefabKind, PrimitiveShape};
pub use math::{Color, Vec3};
pub use prefab::{prefab_definition, PrefabDefinition, PREFAB_DEFINITIONS};
pub use validate::{
    fallback_terrain, validate, validate_str, validate_with_report, ValidationReport, MAX_DEPTH,
};
