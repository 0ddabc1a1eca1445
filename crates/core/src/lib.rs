//! KiranaMitra Core - Inventory domain library.
//!
//! This crate holds everything about the shop's inventory that does not talk to
//! the outside world:
//! - `types` - IDs, items and their drafts, stock levels, advisory reports
//! - `store` - The in-memory inventory store and its snapshots
//! - `session` - Typed presentation state (tabs, add-item modal, analysis lifecycle)
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients. The advisory engine lives in `kirana-mitra-advisor` and consumes
//! [`InventorySnapshot`] values produced here.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod session;
pub mod store;
pub mod types;

pub use session::{
    AnalysisRequest, AnalysisState, AnalysisTicket, Completion, DashboardSummary, HealthRow,
    ShopSession, Tab,
};
pub use store::{InventorySnapshot, InventoryStore};
pub use types::*;
