//! Prompt construction for restocking analysis.
//!
//! Everything the model needs is computed locally first (stock levels, days of
//! cover, the low-stock count and the top seller), so the model only has to
//! phrase advice, not do arithmetic.

use kirana_mitra_core::{InventoryItem, InventorySnapshot};

use crate::sections::Section;

/// A system instruction plus the user turn sent with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Build the analysis prompt for a snapshot.
///
/// Items are listed most urgent first (critical, then warning, then healthy),
/// keeping store order within each level.
#[must_use]
pub fn build_prompt(snapshot: &InventorySnapshot, language: &str) -> Prompt {
    Prompt {
        system: system_instruction(language),
        user: inventory_message(snapshot),
    }
}

fn system_instruction(language: &str) -> String {
    let headings: Vec<String> = Section::ALL.iter().map(|s| s.heading()).collect();

    [
        "You are KiranaMitra, a friendly stock advisor for a small Indian kirana (grocery) shop.".to_string(),
        format!("Reply in {language}. Keep sentences short and practical."),
        String::new(),
        "Answer using exactly these four headings, each alone on its own line, in this order:".to_string(),
        headings.join("\n"),
        String::new(),
        format!(
            "Under {}: one or two lines on overall shop health.",
            Section::Status.heading()
        ),
        format!(
            "Under {}: a bullet list of what to reorder and roughly how much, most urgent first.",
            Section::Actions.heading()
        ),
        format!(
            "Under {}: items whose sales today beat their daily average, or \"none\".",
            Section::FastSellers.heading()
        ),
        format!(
            "Under {}: one short tip for the shop owner.",
            Section::Advice.heading()
        ),
        "Do not write anything before the first heading.".to_string(),
    ]
    .join("\n")
}

fn inventory_message(snapshot: &InventorySnapshot) -> String {
    if snapshot.is_empty() {
        return "The inventory is empty: no items are being tracked yet. \
                Give advice on what a new kirana shop should stock first."
            .to_string();
    }

    let mut items: Vec<&InventoryItem> = snapshot.items().iter().collect();
    items.sort_by_key(|item| item.stock_level());

    let low_stock = snapshot.low_stock().count();
    let top_seller = snapshot
        .top_seller()
        .map_or_else(|| "none".to_string(), |item| sanitize(&item.name));

    let mut lines = vec![
        format!("Inventory snapshot ({} items):", snapshot.len()),
        String::new(),
    ];
    lines.extend(items.into_iter().map(item_line));
    lines.push(String::new());
    lines.push(format!("Items at or below minimum stock: {low_stock}"));
    lines.push(format!("Top seller today: {top_seller}"));

    lines.join("\n")
}

fn item_line(item: &InventoryItem) -> String {
    let cover = item
        .days_of_cover()
        .map_or_else(|| "n/a".to_string(), |days| format!("{days:.1}"));
    let mut line = format!(
        "- {} | category: {} | stock: {} | minimum: {} | avg/day: {:.1} | today: {} | days of cover: {} | level: {}",
        sanitize(&item.name),
        sanitize(&item.category),
        item.current_stock,
        item.minimum_stock,
        item.average_daily_sales,
        item.today_sales,
        cover,
        item.stock_level(),
    );
    if item.is_selling_fast() {
        line.push_str(" | selling fast");
    }
    line
}

/// Keep user-entered labels on one line and out of the field separator.
fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '|' => '/',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect()
}
