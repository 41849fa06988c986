//! Idea synthesis: trend context + user preferences → a typed [`videa_core::VideoIdea`].
//!
//! The synthesizer prefers the stateful assistant-thread path and falls back
//! to a stateless completion on any primary failure; only exhaustion of both
//! paths is terminal.

mod error;
mod prompt;
mod synthesizer;

pub use error::IdeaError;
pub use synthesizer::IdeaSynthesizer;
