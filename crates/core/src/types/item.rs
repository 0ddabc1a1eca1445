//! Inventory items and the draft used to create them.
//!
//! Items are created from a [`NewItem`] draft, which mirrors what a shop owner
//! types into the add-item form: a name, an optional category, and numeric
//! fields that may be missing, numbers, or raw text. [`NewItem::build`] coerces
//! the draft into a validated [`InventoryItem`] with a fresh [`ItemId`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ItemId;
use super::stock::StockLevel;

/// Category assigned when the draft leaves it blank.
pub const DEFAULT_CATEGORY: &str = "General";

/// Categories offered by the add-item form. Any other label is accepted too.
pub const SUGGESTED_CATEGORIES: &[&str] = &["General", "Grains", "Spices", "Cleaning", "Cooking"];

/// Default `current_stock` for a draft that leaves it out.
pub const DEFAULT_CURRENT_STOCK: u32 = 0;
/// Default `minimum_stock` for a draft that leaves it out.
pub const DEFAULT_MINIMUM_STOCK: u32 = 5;
/// Default `average_daily_sales` for a draft that leaves it out.
pub const DEFAULT_AVERAGE_DAILY_SALES: f64 = 1.0;
/// Default `today_sales` for a draft that leaves it out.
pub const DEFAULT_TODAY_SALES: u32 = 0;

/// Errors raised while creating inventory items.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// The item name was empty or whitespace.
    #[error("item name must not be empty")]
    EmptyName,
}

/// One shop product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Opaque unique identifier, assigned at creation.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Free-form category label.
    pub category: String,
    /// Units on hand.
    pub current_stock: u32,
    /// Reorder threshold.
    pub minimum_stock: u32,
    /// Historical units sold per day.
    pub average_daily_sales: f64,
    /// Units sold today.
    pub today_sales: u32,
}

impl InventoryItem {
    /// Stock health of this item.
    #[must_use]
    pub fn stock_level(&self) -> StockLevel {
        StockLevel::classify(self.current_stock, self.minimum_stock)
    }

    /// Whether `current_stock <= minimum_stock`.
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.current_stock <= self.minimum_stock
    }

    /// Days the current stock lasts at the average daily rate.
    ///
    /// `None` when the item has no recorded sales velocity.
    #[must_use]
    pub fn days_of_cover(&self) -> Option<f64> {
        (self.average_daily_sales > 0.0)
            .then(|| f64::from(self.current_stock) / self.average_daily_sales)
    }

    /// Whether today's sales run ahead of the historical average.
    #[must_use]
    pub fn is_selling_fast(&self) -> bool {
        f64::from(self.today_sales) > self.average_daily_sales
    }
}

/// A raw numeric form value: either a number or the text the user typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Already numeric.
    Number(f64),
    /// Unparsed input.
    Text(String),
}

impl FieldValue {
    /// Interpret the value as a non-negative number; anything else is 0.
    #[must_use]
    pub fn to_non_negative(&self) -> f64 {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        };
        if value.is_finite() && value > 0.0 {
            value
        } else {
            0.0
        }
    }

    /// Interpret the value as a non-negative integer, truncating fractions.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to u32 range first
    pub fn to_count(&self) -> u32 {
        self.to_non_negative().trunc().min(f64::from(u32::MAX)) as u32
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Draft for a new inventory item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewItem {
    pub name: String,
    pub category: Option<String>,
    pub current_stock: Option<FieldValue>,
    pub minimum_stock: Option<FieldValue>,
    pub average_daily_sales: Option<FieldValue>,
    pub today_sales: Option<FieldValue>,
}

impl NewItem {
    /// Start a draft with only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn current_stock(mut self, value: impl Into<FieldValue>) -> Self {
        self.current_stock = Some(value.into());
        self
    }

    #[must_use]
    pub fn minimum_stock(mut self, value: impl Into<FieldValue>) -> Self {
        self.minimum_stock = Some(value.into());
        self
    }

    #[must_use]
    pub fn average_daily_sales(mut self, value: impl Into<FieldValue>) -> Self {
        self.average_daily_sales = Some(value.into());
        self
    }

    #[must_use]
    pub fn today_sales(mut self, value: impl Into<FieldValue>) -> Self {
        self.today_sales = Some(value.into());
        self
    }

    /// Validate and coerce the draft into an item with a fresh ID.
    ///
    /// Missing numeric fields take the documented defaults; present but
    /// invalid ones (unparsable, negative, non-finite) become 0.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::EmptyName`] if the trimmed name is empty.
    pub fn build(&self) -> Result<InventoryItem, InventoryError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(InventoryError::EmptyName);
        }

        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY);

        Ok(InventoryItem {
            id: ItemId::generate(),
            name: name.to_owned(),
            category: category.to_owned(),
            current_stock: self
                .current_stock
                .as_ref()
                .map_or(DEFAULT_CURRENT_STOCK, FieldValue::to_count),
            minimum_stock: self
                .minimum_stock
                .as_ref()
                .map_or(DEFAULT_MINIMUM_STOCK, FieldValue::to_count),
            average_daily_sales: self
                .average_daily_sales
                .as_ref()
                .map_or(DEFAULT_AVERAGE_DAILY_SALES, FieldValue::to_non_negative),
            today_sales: self
                .today_sales
                .as_ref()
                .map_or(DEFAULT_TODAY_SALES, FieldValue::to_count),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_only_draft_uses_defaults() {
        let item = NewItem::named("Sugar").build().expect("valid draft");
        assert_eq!(item.name, "Sugar");
        assert_eq!(item.category, DEFAULT_CATEGORY);
        assert_eq!(item.current_stock, 0);
        assert_eq!(item.minimum_stock, 5);
        assert!((item.average_daily_sales - 1.0).abs() < f64::EPSILON);
        assert_eq!(item.today_sales, 0);
    }

    #[test]
    fn test_empty_and_blank_names_are_rejected() {
        assert_eq!(NewItem::named("").build(), Err(InventoryError::EmptyName));
        assert_eq!(NewItem::named("   ").build(), Err(InventoryError::EmptyName));
    }

    #[test]
    fn test_name_and_category_are_trimmed() {
        let item = NewItem::named("  Tea  ")
            .category("  ")
            .build()
            .expect("valid draft");
        assert_eq!(item.name, "Tea");
        assert_eq!(item.category, DEFAULT_CATEGORY);
    }

    #[test]
    fn test_invalid_numbers_become_zero() {
        let item = NewItem::named("Soap")
            .current_stock("lots")
            .minimum_stock(-4.0)
            .average_daily_sales(f64::NAN)
            .today_sales("")
            .build()
            .expect("valid draft");
        assert_eq!(item.current_stock, 0);
        assert_eq!(item.minimum_stock, 0);
        assert!(item.average_daily_sales.abs() < f64::EPSILON);
        assert_eq!(item.today_sales, 0);
    }

    #[test]
    fn test_text_numbers_are_parsed() {
        let item = NewItem::named("Atta")
            .current_stock(" 12 ")
            .minimum_stock("7.9")
            .average_daily_sales("2.5")
            .today_sales(3u32)
            .build()
            .expect("valid draft");
        assert_eq!(item.current_stock, 12);
        assert_eq!(item.minimum_stock, 7);
        assert!((item.average_daily_sales - 2.5).abs() < f64::EPSILON);
        assert_eq!(item.today_sales, 3);
    }

    #[test]
    fn test_each_build_assigns_a_fresh_id() {
        let draft = NewItem::named("Salt");
        let a = draft.build().expect("valid draft");
        let b = draft.build().expect("valid draft");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_days_of_cover_and_selling_fast() {
        let item = NewItem::named("Rice")
            .current_stock(12u32)
            .average_daily_sales(4.0)
            .today_sales(8u32)
            .build()
            .expect("valid draft");
        assert_eq!(item.days_of_cover(), Some(3.0));
        assert!(item.is_selling_fast());

        let idle = NewItem::named("Matches")
            .average_daily_sales(0.0)
            .build()
            .expect("valid draft");
        assert_eq!(idle.days_of_cover(), None);
        assert!(!idle.is_selling_fast());
    }

    #[test]
    fn test_draft_deserializes_mixed_field_values() {
        let json = r#"{"name":"Ghee","current_stock":"3","minimum_stock":6}"#;
        let draft: NewItem = serde_json::from_str(json).expect("deserialize");
        let item = draft.build().expect("valid draft");
        assert_eq!(item.current_stock, 3);
        assert_eq!(item.minimum_stock, 6);
        assert_eq!(item.today_sales, DEFAULT_TODAY_SALES);
    }
}
