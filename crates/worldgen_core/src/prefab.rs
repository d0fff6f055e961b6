//! Prefab catalog
//!
//! Reference metadata for each prefab kind: a human description plus the
//! scale and color a generator should reach for when it has no better idea.

use crate::kind::PrefabKind;
use crate::math::{Color, Vec3};

/// Metadata for one prefab kind
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrefabDefinition {
    pub kind: PrefabKind,
    pub description: &'static str,
    pub default_scale: Vec3,
    pub default_color: Color,
}

/// Catalog entries, in `PrefabKind::ALL` order
pub const PREFAB_DEFINITIONS: [PrefabDefinition; 7] = [
    PrefabDefinition {
        kind: PrefabKind::Chair,
        description: "A simple chair with four legs and a back",
        default_scale: Vec3::new(1.0, 1.0, 1.0),
        default_color: Color::rgb(0.6, 0.4, 0.2),
    },
    PrefabDefinition {
        kind: PrefabKind::Table,
        description: "A simple table with four legs",
        default_scale: Vec3::new(1.5, 1.0, 1.5),
        default_color: Color::rgb(0.6, 0.4, 0.2),
    },
    PrefabDefinition {
        kind: PrefabKind::Tree,
        description: "A basic tree with a trunk and foliage",
        default_scale: Vec3::new(1.0, 2.0, 1.0),
        default_color: Color::rgb(0.2, 0.6, 0.2),
    },
    PrefabDefinition {
        kind: PrefabKind::Lamp,
        description: "A standing lamp with a base, pole and lamp shade",
        default_scale: Vec3::new(1.0, 1.5, 1.0),
        default_color: Color::rgb(0.8, 0.8, 0.8),
    },
    PrefabDefinition {
        kind: PrefabKind::House,
        description: "A simple house with walls and a pitched roof",
        default_scale: Vec3::new(3.0, 2.0, 4.0),
        default_color: Color::rgb(0.9, 0.9, 0.9),
    },
    PrefabDefinition {
        kind: PrefabKind::Car,
        description: "A basic car with a body and wheels",
        default_scale: Vec3::new(1.5, 1.0, 3.0),
        default_color: Color::rgb(0.2, 0.2, 0.7),
    },
    PrefabDefinition {
        kind: PrefabKind::Bench,
        description: "A park bench with a seat and backrest",
        default_scale: Vec3::new(2.0, 1.0, 0.8),
        default_color: Color::rgb(0.4, 0.3, 0.2),
    },
];

/// Look up the catalog entry for a prefab kind
pub fn prefab_definition(kind: PrefabKind) -> &'static PrefabDefinition {
    // Catalog order mirrors PrefabKind::ALL, checked by the test below.
    let index = PrefabKind::ALL
        .iter()
        .position(|k| *k == kind)
        .unwrap_or_default();
    &PREFAB_DEFINITIONS[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_every_prefab() {
        for (def, kind) in PREFAB_DEFINITIONS.iter().zip(PrefabKind::ALL) {
            assert_eq!(def.kind, kind);
            assert_eq!(prefab_definition(kind).kind, kind);
        }
    }

    #[test]
    fn test_house_defaults() {
        let house = prefab_definition(PrefabKind::House);
        assert_eq!(house.default_scale, Vec3::new(3.0, 2.0, 4.0));
        assert!(house.description.contains("roof"));
    }
}
