//! Worldgen Runtime
//!
//! [`WorldGenSession`] is the single owner of everything that changes while
//! a world is on screen: the prompt, the active scene, the loading flags,
//! the reveal scheduler, per-node entry animations and the character
//! roster. A host drives it with one [`tick`](WorldGenSession::tick) per
//! frame and draws it through a [`RenderCapability`].
//!
//! ```rust
//! use std::time::Duration;
//! use worldgen_animation::ManualClock;
//! use worldgen_runtime::{render_visible, RecordingRenderer, SessionConfig, WorldGenSession};
//! use worldgen_service::MockGenerator;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let clock = ManualClock::new();
//! let mut session = WorldGenSession::with_clock(SessionConfig::default(), clock.clone());
//! session.generate_world("a mountain pass", &MockGenerator::new()).await.unwrap();
//!
//! while !session.is_settled() {
//!     clock.advance(Duration::from_millis(16));
//!     session.tick(0.016);
//! }
//!
//! let mut renderer = RecordingRenderer::default();
//! assert_eq!(render_visible(&session, &mut renderer), 10);
//! # }
//! ```

pub mod error;
pub mod render;
pub mod session;

pub use error::{Result, SessionError};
pub use render::{render_visible, DrawItem, Drawable, RecordingRenderer, RenderCapability};
pub use session::{FrameReport, SessionConfig, WorldGenSession};
