//! Worldgen Service
//!
//! The boundary between a prompt and a validated scene:
//!
//! - [`Generator`] is the capability that turns a prompt into untrusted
//!   scene JSON
//! - [`MockGenerator`] answers with one of a handful of canned scenes picked
//!   by keywords in the prompt
//! - [`handle_generate`] implements the generate-world request: it checks
//!   the prompt, runs the generator, validates the result and shapes the
//!   status and JSON body a transport should send back
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use worldgen_service::{handle_generate, MockGenerator};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let generator = MockGenerator::new();
//! let response = handle_generate(&generator, &json!({ "prompt": "a quiet forest" })).await;
//! assert_eq!(response.status, 200);
//! assert!(response.scene().is_some());
//! # }
//! ```

pub mod error;
pub mod generator;
pub mod request;

pub use error::{GenerateError, Result};
pub use generator::{parse_output, Generator, MockGenerator, ReplayGenerator, SceneTheme};
pub use request::{
    handle_generate, handle_generate_bytes, GenerateResponse, ResponseBody, INVALID_PROMPT,
    UNKNOWN_ERROR,
};
