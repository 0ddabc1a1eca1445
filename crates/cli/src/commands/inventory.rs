//! Inventory loading and read-only views.
//!
//! Inventory files are YAML with a list of item drafts. Numeric fields may be
//! numbers or text, as they would be typed into the add-item form:
//!
//! ```yaml
//! items:
//!   - name: Rice (Basmati)
//!     category: Grains
//!     current_stock: 12
//!     minimum_stock: 20
//!     average_daily_sales: 5
//!     today_sales: 8
//!   - name: Sugar            # defaults: stock 0, minimum 5, 1/day, 0 today
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use kirana_mitra_core::{InventoryError, InventoryStore, NewItem, ShopSession};

/// Errors loading an inventory file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid inventory file {path}: {source}")]
    Yaml {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("Item {position} in {path}: {source}")]
    Item {
        path: String,
        position: usize,
        source: InventoryError,
    },
}

#[derive(Debug, Deserialize)]
struct InventoryFile {
    #[serde(default)]
    items: Vec<NewItem>,
}

/// Load the store from `path`, or the demo items when no path is given.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if any item has
/// an empty name.
pub async fn load(path: Option<&Path>) -> Result<InventoryStore, LoadError> {
    let Some(path) = path else {
        info!("No inventory file given, using demo items");
        return Ok(InventoryStore::demo());
    };
    let shown = path.display().to_string();

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: shown.clone(),
            source,
        })?;
    let store = parse(&content, &shown)?;

    info!(path = %shown, items = store.len(), "Loaded inventory");
    Ok(store)
}

fn parse(content: &str, path: &str) -> Result<InventoryStore, LoadError> {
    let file: InventoryFile = serde_yaml::from_str(content).map_err(|source| LoadError::Yaml {
        path: path.to_string(),
        source,
    })?;

    let mut store = InventoryStore::new();
    for (index, draft) in file.items.iter().enumerate() {
        store.add(draft).map_err(|source| LoadError::Item {
            path: path.to_string(),
            position: index + 1,
            source,
        })?;
    }
    Ok(store)
}

/// Print every item with its stock level.
#[allow(clippy::print_stdout)]
pub fn stock(store: &InventoryStore) {
    if store.is_empty() {
        println!("No items in stock.");
        return;
    }

    println!(
        "{:<24} {:<12} {:>7} {:>7} {:>7} {:>6}  LEVEL",
        "NAME", "CATEGORY", "STOCK", "MIN", "AVG/DAY", "TODAY"
    );
    for item in store.items() {
        println!(
            "{:<24} {:<12} {:>7} {:>7} {:>7.1} {:>6}  {}",
            item.name,
            item.category,
            item.current_stock,
            item.minimum_stock,
            item.average_daily_sales,
            item.today_sales,
            item.stock_level(),
        );
    }
}

/// Print the dashboard summary.
#[allow(clippy::print_stdout)]
pub fn dashboard(store: InventoryStore) {
    let summary = ShopSession::new(store).dashboard();

    println!("Low stock items: {}", summary.low_stock_count);
    println!(
        "Top seller today: {}",
        summary.top_seller.as_deref().unwrap_or("-")
    );
    println!();
    println!("Shop health");
    for row in &summary.preview {
        println!(
            "  {:<24} {:<12} {:>5} units  {}",
            row.name, row.category, row.current_stock, row.level
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kirana_mitra_core::StockLevel;

    #[test]
    fn test_parse_inventory_file() {
        let yaml = r#"
items:
  - name: Rice (Basmati)
    category: Grains
    current_stock: 12
    minimum_stock: 20
    average_daily_sales: 5
    today_sales: 8
  - name: "  Sugar "
  - name: Tea
    current_stock: "abc"
    minimum_stock: "-3"
"#;
        let store = parse(yaml, "shop.yaml").expect("parse");
        assert_eq!(store.len(), 3);

        let items = store.items();
        assert_eq!(items[0].stock_level(), StockLevel::Warning);
        assert_eq!(items[1].name, "Sugar");
        assert_eq!(items[1].category, "General");
        assert_eq!(items[1].minimum_stock, 5);
        assert_eq!(items[2].current_stock, 0);
        assert_eq!(items[2].minimum_stock, 0);
    }

    #[test]
    fn test_empty_file_has_no_items() {
        let store = parse("{}", "empty.yaml").expect("parse");
        assert!(store.is_empty());
    }

    #[test]
    fn test_unnamed_item_is_rejected() {
        let yaml = "items:\n  - name: Salt\n  - category: Spices\n";
        let err = parse(yaml, "shop.yaml").expect_err("should fail");
        assert!(matches!(err, LoadError::Item { position: 2, .. }));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = parse("items: [", "bad.yaml").expect_err("should fail");
        assert!(matches!(err, LoadError::Yaml { .. }));
    }

    #[tokio::test]
    async fn test_load_without_path_uses_demo() {
        let store = load(None).await.expect("demo");
        assert_eq!(store.len(), 4);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("kirana-load-{}.yaml", std::process::id()));
        tokio::fs::write(&path, "items:\n  - name: Salt\n    current_stock: 2\n")
            .await
            .expect("write inventory file");

        let store = load(Some(&path)).await;
        let _ = tokio::fs::remove_file(&path).await;

        let store = store.expect("load");
        assert_eq!(store.len(), 1);
        assert_eq!(store.items()[0].name, "Salt");
        assert_eq!(store.items()[0].current_stock, 2);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = load(Some(Path::new("/nonexistent/kirana.yaml")))
            .await
            .expect_err("should fail");
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
