//! In-memory inventory store.
//!
//! The store is a plain ordered collection. Mutations run to completion
//! synchronously; readers that need a stable view across an await point take
//! an owned [`InventorySnapshot`] instead of borrowing the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{InventoryError, InventoryItem, ItemId, NewItem, StockLevel};

/// The shop's current items, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryStore {
    items: Vec<InventoryItem>,
}

impl InventoryStore {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// A store seeded with the demo items a fresh install starts with.
    #[must_use]
    pub fn demo() -> Self {
        [
            ("Rice (Basmati)", "Grains", 12, 20, 5.0, 8),
            ("Cooking Oil", "Cooking", 45, 15, 3.0, 2),
            ("Dal (Moong)", "Grains", 8, 10, 2.0, 4),
            ("Salt", "Spices", 50, 10, 1.0, 1),
        ]
        .into_iter()
        .map(
            |(name, category, current_stock, minimum_stock, average_daily_sales, today_sales)| {
                InventoryItem {
                    id: ItemId::generate(),
                    name: name.to_string(),
                    category: category.to_string(),
                    current_stock,
                    minimum_stock,
                    average_daily_sales,
                    today_sales,
                }
            },
        )
        .collect()
    }

    /// Create an item from a draft and append it.
    ///
    /// Items with identical names are allowed.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::EmptyName`] if the draft has no name; the
    /// store is left unchanged.
    pub fn add(&mut self, draft: &NewItem) -> Result<ItemId, InventoryError> {
        let item = draft.build()?;
        let id = item.id;
        self.items.push(item);
        Ok(id)
    }

    /// Remove the item with `id`, returning it. No-op if absent.
    pub fn remove(&mut self, id: ItemId) -> Option<InventoryItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&InventoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    #[must_use]
    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items at or below their reorder threshold, in store order.
    pub fn low_stock(&self) -> impl Iterator<Item = &InventoryItem> {
        low_stock(&self.items)
    }

    /// The item with the most sales today; earliest wins ties.
    #[must_use]
    pub fn top_seller(&self) -> Option<&InventoryItem> {
        top_seller(&self.items)
    }

    /// Stock health of an item.
    #[must_use]
    pub fn stock_level(item: &InventoryItem) -> StockLevel {
        item.stock_level()
    }

    /// Take an owned copy of the current items.
    #[must_use]
    pub fn snapshot(&self) -> InventorySnapshot {
        InventorySnapshot {
            items: self.items.clone(),
            taken_at: Utc::now(),
        }
    }
}

impl FromIterator<InventoryItem> for InventoryStore {
    fn from_iter<I: IntoIterator<Item = InventoryItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// An immutable copy of the store's items at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    items: Vec<InventoryItem>,
    taken_at: DateTime<Utc>,
}

impl InventorySnapshot {
    /// Build a snapshot directly from items.
    #[must_use]
    pub fn from_items(items: Vec<InventoryItem>) -> Self {
        Self {
            items,
            taken_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    #[must_use]
    pub const fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn low_stock(&self) -> impl Iterator<Item = &InventoryItem> {
        low_stock(&self.items)
    }

    #[must_use]
    pub fn top_seller(&self) -> Option<&InventoryItem> {
        top_seller(&self.items)
    }
}

fn low_stock(items: &[InventoryItem]) -> impl Iterator<Item = &InventoryItem> {
    items.iter().filter(|item| item.is_low_stock())
}

fn top_seller(items: &[InventoryItem]) -> Option<&InventoryItem> {
    // Only a strictly greater count replaces the current best.
    items.iter().fold(None, |best: Option<&InventoryItem>, item| match best {
        Some(b) if item.today_sales <= b.today_sales => Some(b),
        _ => Some(item),
    })
}
