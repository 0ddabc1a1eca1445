//! Gemini API integration for restocking advice.
//!
//! # Features
//!
//! - Single-turn `generateContent` calls with a system instruction
//! - API key sent in the `x-goog-api-key` header, never logged
//! - Typed mapping of rate limits, auth failures and API error envelopes
//!
//! Streaming responses are not used; an analysis is one round trip.

pub mod client;
pub mod error;
pub mod types;

pub use client::GeminiClient;
pub use error::GeminiError;
pub use types::{FinishReason, GenerateContentResponse};
