//! KiranaMitra Advisor - restocking advice from a generative model.
//!
//! - `config` - Environment-based configuration for the Gemini backend
//! - `gemini` - HTTP client for the Gemini `generateContent` API
//! - `prompt` - Prompt construction from an inventory snapshot
//! - `sections` - Heading contract and reply parsing
//! - `engine` - [`AdvisoryEngine`], which ties the above together and never fails
//!
//! # Example
//!
//! ```rust,ignore
//! use kirana_mitra_advisor::{AdvisorConfig, AdvisoryEngine};
//! use kirana_mitra_core::InventoryStore;
//!
//! let config = AdvisorConfig::from_env()?;
//! let engine = AdvisoryEngine::from_config(&config)?;
//! let report = engine.analyze(InventoryStore::demo().snapshot()).await;
//! println!("{}", report.advice);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod engine;
pub mod gemini;
pub mod prompt;
pub mod sections;

pub use config::{AdvisorConfig, ConfigError, GeminiConfig};
pub use engine::{AdvisoryEngine, GenerationError, TextGenerator};
pub use gemini::{GeminiClient, GeminiError};
pub use prompt::{Prompt, build_prompt};
pub use sections::{Section, parse_reply};
