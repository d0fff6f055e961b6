//! Character store
//!
//! Owns every character, the single controlled-character slot, the log of
//! actions taken and the replies waiting to fire. Granting control to one
//! character always releases the previous one, so at most one character is
//! controlled at any time.

use crate::character::{Character, CharacterDraft, CharacterKind};
use crate::error::{CharacterError, Result};
use slotmap::{new_key_type, SlotMap};
use std::time::Duration;
use worldgen_core::Vec3;

new_key_type! {
    /// Handle to a character in a [`CharacterStore`]
    pub struct CharacterId;
}

/// Distance per movement input
pub const MOVE_STEP: f32 = 0.1;

/// Greeting range for [`CharacterStore::interact`], measured on the ground plane
pub const INTERACT_RANGE: f32 = 5.0;

const DEFAULT_REPLY_DELAY: Duration = Duration::from_secs(1);

/// Something a character did
#[derive(Clone, Debug, PartialEq)]
pub enum CharacterAction {
    MoveTo {
        character: CharacterId,
        destination: Vec3,
    },
    Speak {
        character: CharacterId,
        message: String,
    },
}

impl CharacterAction {
    pub fn character(&self) -> CharacterId {
        match self {
            CharacterAction::MoveTo { character, .. } | CharacterAction::Speak { character, .. } => {
                *character
            }
        }
    }
}

#[derive(Clone, Debug)]
struct ScheduledReply {
    due: Duration,
    responder: CharacterId,
    trigger: String,
}

/// Keyed character roster with a single-controller invariant
#[derive(Debug)]
pub struct CharacterStore {
    characters: SlotMap<CharacterId, Character>,
    /// Insertion order; slot keys are reused after removal
    order: Vec<CharacterId>,
    controlled: Option<CharacterId>,
    actions: Vec<CharacterAction>,
    scheduled: Vec<ScheduledReply>,
    reply_delay: Duration,
    replies_sent: usize,
}

impl Default for CharacterStore {
    fn default() -> Self {
        Self::new(DEFAULT_REPLY_DELAY)
    }
}

impl CharacterStore {
    /// Create an empty store whose scripted replies fire `reply_delay` after
    /// the player speaks
    pub fn new(reply_delay: Duration) -> Self {
        Self {
            characters: SlotMap::with_key(),
            order: Vec::new(),
            controlled: None,
            actions: Vec::new(),
            scheduled: Vec::new(),
            reply_delay,
            replies_sent: 0,
        }
    }

    pub fn add(&mut self, draft: CharacterDraft) -> CharacterId {
        let character = draft.build();
        tracing::debug!("Character added: {}", character.name);
        let id = self.characters.insert(character);
        self.order.push(id);
        id
    }

    pub fn remove(&mut self, id: CharacterId) -> Option<Character> {
        let character = self.characters.remove(id)?;
        self.order.retain(|other| *other != id);
        if self.controlled == Some(id) {
            self.controlled = None;
        }
        Some(character)
    }

    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(id)
    }

    /// Edit a character in place
    ///
    /// The controlled flag is owned by the store; changes to it made here
    /// are discarded. Use [`control`](Self::control) and
    /// [`release`](Self::release) instead.
    pub fn update<F>(&mut self, id: CharacterId, f: F) -> Result<()>
    where
        F: FnOnce(&mut Character),
    {
        let controlled = self.controlled == Some(id);
        let character = self.get_mut(id)?;
        f(character);
        character.is_controlled = controlled;
        Ok(())
    }

    /// Hand control to `id`, releasing whoever held it
    pub fn control(&mut self, id: CharacterId) -> Result<()> {
        if !self.characters.contains_key(id) {
            return Err(CharacterError::NotFound(id));
        }
        if let Some(previous) = self.controlled.take() {
            if let Some(character) = self.characters.get_mut(previous) {
                character.is_controlled = false;
            }
        }

        let character = self.get_mut(id)?;
        character.is_controlled = true;
        character.kind = CharacterKind::Player;
        tracing::debug!("Now controlling {}", character.name);
        self.controlled = Some(id);
        Ok(())
    }

    pub fn release(&mut self, id: CharacterId) -> Result<()> {
        self.get_mut(id)?.is_controlled = false;
        if self.controlled == Some(id) {
            self.controlled = None;
        }
        Ok(())
    }

    pub fn controlled(&self) -> Option<CharacterId> {
        self.controlled
    }

    /// Record a move and place the character at `destination`
    pub fn move_to(&mut self, id: CharacterId, destination: Vec3) -> Result<()> {
        self.get_mut(id)?.position = destination;
        self.actions.push(CharacterAction::MoveTo {
            character: id,
            destination,
        });
        Ok(())
    }

    /// Shift the controlled character along the ground plane
    ///
    /// Returns the new position.
    pub fn nudge(&mut self, id: CharacterId, dx: f32, dz: f32) -> Result<Vec3> {
        if self.controlled != Some(id) {
            return Err(CharacterError::NotControlled(id));
        }
        let character = self.get_mut(id)?;
        character.position.x += dx;
        character.position.z += dz;
        Ok(character.position)
    }

    /// Record speech; a player speaking gets a reply from the first
    /// scripted character after the reply delay
    pub fn speak(&mut self, id: CharacterId, message: impl Into<String>, now: Duration) -> Result<()> {
        let message = message.into();
        let speaker = self.characters.get(id).ok_or(CharacterError::NotFound(id))?;

        if speaker.kind == CharacterKind::Player {
            let responder = self.order.iter().copied().find(|other| {
                *other != id && self.characters[*other].kind == CharacterKind::Ai
            });
            if let Some(responder) = responder {
                self.scheduled.push(ScheduledReply {
                    due: now + self.reply_delay,
                    responder,
                    trigger: message.clone(),
                });
            }
        }

        self.actions.push(CharacterAction::Speak {
            character: id,
            message,
        });
        Ok(())
    }

    /// Controlled character greets the nearest other character in range
    ///
    /// Returns who was greeted.
    pub fn interact(&mut self, now: Duration) -> Option<CharacterId> {
        let id = self.controlled?;
        let origin = self.characters.get(id)?.position;

        let (nearest, distance) = self
            .order
            .iter()
            .copied()
            .filter(|other| *other != id)
            .map(|other| (other, ground_distance(origin, self.characters[other].position)))
            .min_by(|a, b| a.1.total_cmp(&b.1))?;

        if distance >= INTERACT_RANGE {
            return None;
        }

        let greeting = format!("Hello {}!", self.characters[nearest].name);
        self.speak(id, greeting, now).ok()?;
        Some(nearest)
    }

    /// Fire replies due at `now`; returns the speech actions produced
    pub fn tick(&mut self, now: Duration) -> Vec<CharacterAction> {
        if self.scheduled.is_empty() {
            return Vec::new();
        }

        let (due, waiting): (Vec<_>, Vec<_>) = self
            .scheduled
            .drain(..)
            .partition(|reply| reply.due <= now);
        self.scheduled = waiting;

        let mut fired = Vec::new();
        for reply in due {
            // responder may have left the world since
            let Some(responder) = self.characters.get(reply.responder) else {
                continue;
            };
            let message = scripted_reply(self.replies_sent, &responder.name, &reply.trigger);
            self.replies_sent += 1;

            let action = CharacterAction::Speak {
                character: reply.responder,
                message,
            };
            self.actions.push(action.clone());
            fired.push(action);
        }
        fired
    }

    /// Every action recorded so far, oldest first
    pub fn actions(&self) -> &[CharacterAction] {
        &self.actions
    }

    pub fn drain_actions(&mut self) -> Vec<CharacterAction> {
        std::mem::take(&mut self.actions)
    }

    pub fn pending_replies(&self) -> usize {
        self.scheduled.len()
    }

    /// Characters in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (CharacterId, &Character)> {
        self.order.iter().map(|id| (*id, &self.characters[*id]))
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    fn get_mut(&mut self, id: CharacterId) -> Result<&mut Character> {
        self.characters
            .get_mut(id)
            .ok_or(CharacterError::NotFound(id))
    }
}

fn ground_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

fn scripted_reply(index: usize, name: &str, trigger: &str) -> String {
    match index % 5 {
        0 => format!("Hello there! I'm {}.", name),
        1 => "Welcome to this world!".to_string(),
        2 => {
            let head: String = trigger.chars().take(10).collect();
            format!("Interesting point about \"{}...\"", head)
        }
        3 => "I was just exploring this area.".to_string(),
        _ => "What brings you here?".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    fn controlled_count(store: &CharacterStore) -> usize {
        store.iter().filter(|(_, c)| c.is_controlled).count()
    }

    #[test]
    fn test_single_controller() {
        let mut store = CharacterStore::default();
        let a = store.add(CharacterDraft::named("A"));
        let b = store.add(CharacterDraft::named("B"));

        store.control(a).unwrap();
        assert_eq!(store.controlled(), Some(a));
        assert_eq!(store.get(a).unwrap().kind, CharacterKind::Player);

        store.control(b).unwrap();
        assert_eq!(store.controlled(), Some(b));
        assert!(!store.get(a).unwrap().is_controlled);
        assert_eq!(controlled_count(&store), 1);

        store.release(b).unwrap();
        assert_eq!(store.controlled(), None);
        assert_eq!(controlled_count(&store), 0);
    }

    #[test]
    fn test_update_cannot_break_invariant() {
        let mut store = CharacterStore::default();
        let a = store.add(CharacterDraft::named("A"));
        let b = store.add(CharacterDraft::named("B"));
        store.control(a).unwrap();

        store
            .update(b, |c| {
                c.is_controlled = true;
                c.name = "Bee".into();
            })
            .unwrap();
        assert_eq!(store.get(b).unwrap().name, "Bee");
        assert_eq!(controlled_count(&store), 1);
        assert!(store.get(a).unwrap().is_controlled);
    }

    #[test]
    fn test_remove_controlled_releases() {
        let mut store = CharacterStore::default();
        let a = store.add(CharacterDraft::named("A"));
        store.control(a).unwrap();
        assert!(store.remove(a).is_some());
        assert_eq!(store.controlled(), None);
        assert_eq!(store.control(a), Err(CharacterError::NotFound(a)));
    }

    #[test]
    fn test_move_and_nudge() {
        let mut store = CharacterStore::default();
        let a = store.add(CharacterDraft::named("A"));

        store.move_to(a, Vec3::new(3.0, 0.0, 3.0)).unwrap();
        assert_eq!(store.get(a).unwrap().position, Vec3::new(3.0, 0.0, 3.0));
        assert_eq!(
            store.actions(),
            &[CharacterAction::MoveTo {
                character: a,
                destination: Vec3::new(3.0, 0.0, 3.0)
            }]
        );

        assert_eq!(store.nudge(a, MOVE_STEP, 0.0), Err(CharacterError::NotControlled(a)));
        store.control(a).unwrap();
        let pos = store.nudge(a, 0.0, -MOVE_STEP).unwrap();
        assert!(pos.approx_eq(&Vec3::new(3.0, 0.0, 2.9), 1e-6));
    }

    #[test]
    fn test_player_speech_schedules_reply() {
        let mut store = CharacterStore::new(secs(1));
        let guide = store.add(CharacterDraft::named("Guide"));
        let player = store.add(CharacterDraft::named("Player"));
        store.control(player).unwrap();

        store.speak(player, "anybody around here?", secs(10)).unwrap();
        assert_eq!(store.pending_replies(), 1);
        assert!(store.tick(secs(10)).is_empty());

        let fired = store.tick(secs(11));
        assert_eq!(
            fired,
            vec![CharacterAction::Speak {
                character: guide,
                message: "Hello there! I'm Guide.".into()
            }]
        );
        assert_eq!(store.actions().len(), 2);
        assert_eq!(store.pending_replies(), 0);
    }

    #[test]
    fn test_replies_rotate() {
        let mut store = CharacterStore::new(Duration::ZERO);
        store.add(CharacterDraft::named("Guide"));
        let player = store.add(CharacterDraft::named("P"));
        store.control(player).unwrap();

        let mut lines = Vec::new();
        for _ in 0..6 {
            store.speak(player, "a remarkable lighthouse", secs(0)).unwrap();
            for action in store.tick(secs(0)) {
                if let CharacterAction::Speak { message, .. } = action {
                    lines.push(message);
                }
            }
        }

        assert_eq!(lines[1], "Welcome to this world!");
        assert_eq!(lines[2], "Interesting point about \"a remarkab...\"");
        assert_eq!(lines[4], "What brings you here?");
        assert_eq!(lines[5], lines[0]);
    }

    #[test]
    fn test_ai_speech_gets_no_reply() {
        let mut store = CharacterStore::default();
        let a = store.add(CharacterDraft::named("A"));
        store.add(CharacterDraft::named("B"));
        store.speak(a, "hi", secs(0)).unwrap();
        assert_eq!(store.pending_replies(), 0);
    }

    #[test]
    fn test_reply_skipped_when_responder_removed() {
        let mut store = CharacterStore::default();
        let guide = store.add(CharacterDraft::named("Guide"));
        let player = store.add(CharacterDraft::named("P"));
        store.control(player).unwrap();
        store.speak(player, "hi", secs(0)).unwrap();
        store.remove(guide);
        assert!(store.tick(secs(5)).is_empty());
    }

    #[test]
    fn test_interact_greets_nearest_in_range() {
        let mut store = CharacterStore::default();
        let player = store.add(CharacterDraft::named("P"));
        let far = store.add(CharacterDraft::named("Far").at(Vec3::new(4.5, 0.0, 0.0)));
        let near = store.add(CharacterDraft::named("Near").at(Vec3::new(0.0, 9.0, 2.0)));

        assert_eq!(store.interact(secs(0)), None);
        store.control(player).unwrap();

        // height is ignored, so Near is 2 units away
        assert_eq!(store.interact(secs(0)), Some(near));
        assert_eq!(
            store.actions().last(),
            Some(&CharacterAction::Speak {
                character: player,
                message: "Hello Near!".into()
            })
        );

        store.remove(near);
        assert_eq!(store.interact(secs(0)), Some(far));
        store.move_to(far, Vec3::new(6.0, 0.0, 0.0)).unwrap();
        assert_eq!(store.interact(secs(0)), None);
    }

    #[test]
    fn test_drain_actions() {
        let mut store = CharacterStore::default();
        let a = store.add(CharacterDraft::named("A"));
        store.move_to(a, Vec3::ONE).unwrap();
        assert_eq!(store.drain_actions().len(), 1);
        assert!(store.actions().is_empty());
    }
}
