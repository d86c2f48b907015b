//! reportcard-enhance
//!
//! Rewrites a report section through an OpenAI-compatible chat completion
//! endpoint and normalises the reply to plain text of bounded length.

pub mod client;
pub mod error;
pub mod normalize;
pub mod prompt;
