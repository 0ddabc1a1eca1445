//! Core types for KiranaMitra.
//!
//! This module provides type-safe wrappers for the inventory domain.

pub mod id;
pub mod item;
pub mod report;
pub mod stock;

pub use id::*;
pub use item::{
    DEFAULT_AVERAGE_DAILY_SALES, DEFAULT_CATEGORY, DEFAULT_CURRENT_STOCK, DEFAULT_MINIMUM_STOCK,
    DEFAULT_TODAY_SALES, FieldValue, InventoryError, InventoryItem, NewItem, SUGGESTED_CATEGORIES,
};
pub use report::{AdvisoryReport, ReportSource, UNAVAILABLE_ADVICE};
pub use stock::StockLevel;
