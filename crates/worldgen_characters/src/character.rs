//! Character data

use serde::{Deserialize, Serialize};
use worldgen_core::{Color, Vec3};

/// Who drives a character
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterKind {
    /// Scripted; answers the player
    #[default]
    Ai,
    /// Has been taken over by the user at some point
    Player,
}

/// Body proportions and colors
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appearance {
    pub head_color: Color,
    pub body_color: Color,
    pub limb_color: Color,
    pub height: f32,
    pub width: f32,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            head_color: Color::rgb(0.8, 0.5, 0.5),
            body_color: Color::rgb(0.3, 0.6, 0.8),
            limb_color: Color::rgb(0.3, 0.6, 0.8),
            height: 2.0,
            width: 1.0,
        }
    }
}

/// A character in the world
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub name: String,
    pub description: String,
    pub position: Vec3,
    pub appearance: Appearance,
    #[serde(rename = "type")]
    pub kind: CharacterKind,
    /// Maintained by the store; at most one character has this set
    pub is_controlled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
}

impl Default for Character {
    fn default() -> Self {
        Self {
            name: "New Character".to_string(),
            description: "A mysterious character".to_string(),
            position: Vec3::ZERO,
            appearance: Appearance::default(),
            kind: CharacterKind::Ai,
            is_controlled: false,
            personality: None,
        }
    }
}

/// Partial character description; unset fields take the defaults
#[derive(Clone, Debug, Default)]
pub struct CharacterDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub position: Option<Vec3>,
    pub appearance: Option<Appearance>,
    pub kind: Option<CharacterKind>,
    pub personality: Option<String>,
}

impl CharacterDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = Some(position);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn personality(mut self, personality: impl Into<String>) -> Self {
        self.personality = Some(personality.into());
        self
    }

    pub fn kind(mut self, kind: CharacterKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Fill unset fields from [`Character::default`]
    pub fn build(self) -> Character {
        let defaults = Character::default();
        Character {
            name: self.name.unwrap_or(defaults.name),
            description: self.description.unwrap_or(defaults.description),
            position: self.position.unwrap_or(defaults.position),
            appearance: self.appearance.unwrap_or(defaults.appearance),
            kind: self.kind.unwrap_or(defaults.kind),
            is_controlled: false,
            personality: self.personality.or(defaults.personality),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_defaults() {
        let c = CharacterDraft::default().build();
        assert_eq!(c.name, "New Character");
        assert_eq!(c.description, "A mysterious character");
        assert_eq!(c.kind, CharacterKind::Ai);
        assert_eq!(c.appearance.height, 2.0);
        assert_eq!(c.appearance.head_color, Color::rgb(0.8, 0.5, 0.5));
        assert!(!c.is_controlled);
    }

    #[test]
    fn test_draft_overrides() {
        let c = CharacterDraft::named("Mira")
            .at(Vec3::new(1.0, 0.0, 2.0))
            .personality("curious")
            .build();
        assert_eq!(c.name, "Mira");
        assert_eq!(c.position, Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(c.personality.as_deref(), Some("curious"));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(CharacterDraft::named("Mira").build()).unwrap();
        assert_eq!(json["type"], "ai");
        assert_eq!(json["isControlled"], false);
        assert_eq!(json["appearance"]["bodyColor"], serde_json::json!([0.3f32, 0.6f32, 0.8f32]));
        assert!(json.get("personality").is_none());
    }
}
