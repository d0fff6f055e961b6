//! Rendering seam
//!
//! The runtime does not know how shapes look. It resolves every node to a
//! [`Drawable`] and hands it, with the node's current entry pose, to a
//! [`RenderCapability`]. Every tag resolves to something drawable; unknown
//! tags fall back to the box primitive.

use crate::session::WorldGenSession;
use worldgen_animation::{Clock, Pose};
use worldgen_core::{
    join_path, prefab_definition, Color, NodeKind, PrefabDefinition, PrefabKind, PrimitiveShape,
    SceneNode, Vec3,
};

/// What to draw for one node
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Drawable {
    /// A single geometric shape
    Primitive(PrimitiveShape),
    /// A composite object; scale and color parameterize its parts
    Prefab {
        kind: PrefabKind,
        scale: Vec3,
        color: Color,
    },
}

impl Drawable {
    /// Resolve a raw type tag
    pub fn from_tag(tag: &str, scale: Vec3, color: Color) -> Drawable {
        Self::from_kind(NodeKind::from_tag(tag), scale, color)
    }

    pub fn from_kind(kind: NodeKind, scale: Vec3, color: Color) -> Drawable {
        match kind {
            NodeKind::Primitive(shape) => Drawable::Primitive(shape),
            NodeKind::Prefab(kind) => Drawable::Prefab { kind, scale, color },
        }
    }

    pub fn for_node(node: &SceneNode) -> Drawable {
        Self::from_kind(node.kind, node.scale, node.color)
    }

    /// Catalog entry for prefab drawables
    pub fn definition(&self) -> Option<&'static PrefabDefinition> {
        match self {
            Drawable::Prefab { kind, .. } => Some(prefab_definition(*kind)),
            Drawable::Primitive(_) => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Drawable::Primitive(shape) => shape.as_str(),
            Drawable::Prefab { kind, .. } => kind.as_str(),
        }
    }
}

/// One node ready to draw
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawItem<'a> {
    pub path: &'a str,
    /// Nesting depth; top-level nodes are 0
    pub depth: usize,
    pub shape: Drawable,
    /// Current entry pose; position is relative to the parent
    pub pose: Pose,
    pub color: Color,
}

/// Something that can draw resolved nodes
pub trait RenderCapability {
    fn draw(&mut self, item: &DrawItem<'_>);
}

/// Draw every visible node of `session` in pre-order
///
/// A node's subtree is skipped while the node itself is not visible.
/// Returns the number of items drawn.
pub fn render_visible<C: Clock>(
    session: &WorldGenSession<C>,
    renderer: &mut impl RenderCapability,
) -> usize {
    let Some(scene) = session.scene() else {
        return 0;
    };

    let mut drawn = 0;
    for node in &scene.children {
        drawn += draw_subtree(session, renderer, node, None, 0);
    }
    drawn
}

fn draw_subtree<C: Clock>(
    session: &WorldGenSession<C>,
    renderer: &mut impl RenderCapability,
    node: &SceneNode,
    parent: Option<&str>,
    depth: usize,
) -> usize {
    let path = join_path(parent, &node.id);
    if !session.is_visible(&path) {
        return 0;
    }

    let pose = session.pose(&path).unwrap_or_else(|| Pose::of(node));
    renderer.draw(&DrawItem {
        path: &path,
        depth,
        shape: Drawable::for_node(node),
        pose,
        color: node.color,
    });

    let mut drawn = 1;
    for child in &node.children {
        drawn += draw_subtree(session, renderer, child, Some(&path), depth + 1);
    }
    drawn
}

/// Records draw calls; used by tests and the preview command
#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    pub items: Vec<RecordedDraw>,
}

/// Owned copy of a [`DrawItem`]
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedDraw {
    pub path: String,
    pub depth: usize,
    pub shape: Drawable,
    pub pose: Pose,
    pub color: Color,
}

impl RecordingRenderer {
    pub fn paths(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.path.as_str()).collect()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl RenderCapability for RecordingRenderer {
    fn draw(&mut self, item: &DrawItem<'_>) {
        self.items.push(RecordedDraw {
            path: item.path.to_string(),
            depth: item.depth,
            shape: item.shape,
            pose: item.pose,
            color: item.color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionConfig;
    use serde_json::Value;
    use std::future::Future;
    use std::time::Duration;
    use worldgen_animation::{ManualClock, RevealConfig};
    use worldgen_service::{Generator, MockGenerator};

    struct RawGenerator(Value);

    impl Generator for RawGenerator {
        fn generate(
            &self,
            _prompt: &str,
        ) -> impl Future<Output = worldgen_service::Result<Value>> + Send {
            std::future::ready(Ok(self.0.clone()))
        }
    }

    #[test]
    fn test_every_tag_resolves() {
        for kind in NodeKind::ALL {
            let drawable = Drawable::from_tag(kind.as_str(), Vec3::ONE, Color::WHITE);
            assert_eq!(drawable.tag(), kind.as_str());
            assert_eq!(drawable.definition().is_some(), kind.is_prefab());
        }

        assert_eq!(
            Drawable::from_tag("hovercraft", Vec3::ONE, Color::WHITE),
            Drawable::Primitive(PrimitiveShape::Box)
        );
    }

    #[test]
    fn test_prefab_carries_scale_and_color() {
        let drawable = Drawable::from_tag("bench", Vec3::splat(2.0), Color::BLACK);
        assert_eq!(
            drawable,
            Drawable::Prefab {
                kind: PrefabKind::Bench,
                scale: Vec3::splat(2.0),
                color: Color::BLACK
            }
        );
        assert!(drawable.definition().unwrap().description.contains("bench"));
    }

    #[tokio::test]
    async fn test_hidden_parent_hides_children() {
        // one path per batch makes the reveal boundary easy to hit
        let config = SessionConfig {
            reveal: RevealConfig {
                batch_size: 1,
                publish_delay_ms: 10,
                cooldown_ms: 10,
            },
            install_delay_ms: 0,
            ..Default::default()
        };
        let clock = ManualClock::new();
        let mut session = WorldGenSession::with_clock(config, clock.clone());
        let generator = RawGenerator(serde_json::json!({
            "id": "world",
            "children": [
                { "id": "base", "type": "cylinder", "position": [0, 2, 0],
                  "children": [{ "id": "top", "type": "lamp", "position": [0, 3, 0] }] },
                { "id": "rock", "type": "box", "position": [5, 0, 0] }
            ]
        }));
        session.generate_world("x", &generator).await.unwrap();

        let mut renderer = RecordingRenderer::default();
        assert_eq!(render_visible(&session, &mut renderer), 0);

        // install and start the first batch, then publish it
        session.tick(0.0);
        clock.advance(Duration::from_millis(10));
        session.tick(0.0);

        assert_eq!(render_visible(&session, &mut renderer), 1);
        assert_eq!(renderer.paths(), vec!["base"]);

        let item = &renderer.items[0];
        assert_eq!(item.depth, 0);
        assert_eq!(item.shape, Drawable::Primitive(PrimitiveShape::Cylinder));
        // entry starts one unit low and tiny
        assert_eq!(item.pose.position, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(item.pose.scale, Vec3::splat(0.01));

        while !session.is_settled() {
            clock.advance(Duration::from_millis(10));
            session.tick(0.01);
        }
        renderer.clear();
        assert_eq!(render_visible(&session, &mut renderer), 3);
        assert_eq!(renderer.paths(), vec!["base", "base.top", "rock"]);
        assert_eq!(renderer.items[1].depth, 1);
    }

    #[tokio::test]
    async fn test_nothing_drawn_without_scene() {
        let clock = ManualClock::new();
        let mut session = WorldGenSession::with_clock(SessionConfig::default(), clock);
        let mut renderer = RecordingRenderer::default();
        assert_eq!(render_visible(&session, &mut renderer), 0);

        session.generate_world("a village", &MockGenerator::new()).await.unwrap();
        assert_eq!(render_visible(&session, &mut renderer), 0);
    }
}
