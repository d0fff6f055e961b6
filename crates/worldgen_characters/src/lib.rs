//! Worldgen Characters
//!
//! Humanoid characters placed into a generated world. One character at a
//! time may be controlled by the user; the rest are scripted and answer the
//! player with canned replies after a short delay.
//!
//! The store is a plain owned value. Time is passed in by the caller (the
//! same clock reading the session uses for reveal timers) so replies fire
//! deterministically from [`CharacterStore::tick`].

pub mod character;
pub mod error;
pub mod store;

pub use character::{Appearance, Character, CharacterDraft, CharacterKind};
pub use error::{CharacterError, Result};
pub use store::{CharacterAction, CharacterId, CharacterStore, INTERACT_RANGE, MOVE_STEP};
