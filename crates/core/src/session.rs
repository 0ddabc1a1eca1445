//! Typed presentation state for a shop session.
//!
//! [`ShopSession`] owns the inventory store plus everything a front end needs
//! to render the dashboard, stock table, add-item modal and advice panel. All
//! transitions are plain method calls; the only asynchronous step, running an
//! analysis, is split into [`ShopSession::begin_analysis`] and
//! [`ShopSession::complete_analysis`] so the caller can await the engine in
//! between without holding a borrow of the session.

use serde::{Deserialize, Serialize};

use crate::store::{InventorySnapshot, InventoryStore};
use crate::types::{
    AdvisoryReport, DEFAULT_AVERAGE_DAILY_SALES, DEFAULT_CATEGORY, DEFAULT_CURRENT_STOCK,
    DEFAULT_MINIMUM_STOCK, DEFAULT_TODAY_SALES, InventoryError, InventoryItem, ItemId, NewItem,
    StockLevel,
};

/// Number of items shown on the dashboard's shop health card.
pub const DASHBOARD_PREVIEW_LEN: usize = 4;

/// Top-level navigation tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Dashboard,
    Stock,
    Advisor,
}

/// Identifies one analysis request. Only the latest ticket may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnalysisTicket(u64);

impl AnalysisTicket {
    #[must_use]
    pub const fn sequence(self) -> u64 {
        self.0
    }
}

/// A started analysis: the ticket to complete it with and the items to analyze.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub ticket: AnalysisTicket,
    pub snapshot: InventorySnapshot,
}

/// Where the advice panel is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnalysisState {
    #[default]
    Idle,
    Analyzing { ticket: AnalysisTicket },
    Ready { report: AdvisoryReport },
}

/// Whether a completed analysis was applied to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer analysis was requested after this one; the result was dropped.
    Stale,
}

/// One row of the dashboard's shop health preview.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthRow {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    pub current_stock: u32,
    pub level: StockLevel,
}

/// Figures shown on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub low_stock_count: usize,
    pub top_seller: Option<String>,
    pub preview: Vec<HealthRow>,
}

/// Session state for one shop owner.
#[derive(Debug, Clone, Default)]
pub struct ShopSession {
    store: InventoryStore,
    tab: Tab,
    draft: Option<NewItem>,
    analysis: AnalysisState,
    last_ticket: u64,
}

impl ShopSession {
    #[must_use]
    pub fn new(store: InventoryStore) -> Self {
        Self {
            store,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn store(&self) -> &InventoryStore {
        &self.store
    }

    #[must_use]
    pub const fn tab(&self) -> Tab {
        self.tab
    }

    pub const fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    // =========================================================================
    // Add-item modal
    // =========================================================================

    /// Open the add-item modal with a fresh draft. Keeps an existing draft.
    pub fn open_add_item(&mut self) {
        if self.draft.is_none() {
            self.draft = Some(blank_draft());
        }
    }

    /// Close the modal, discarding the draft.
    pub fn cancel_add_item(&mut self) {
        self.draft = None;
    }

    #[must_use]
    pub const fn is_adding_item(&self) -> bool {
        self.draft.is_some()
    }

    /// The draft being edited, if the modal is open.
    pub const fn draft_mut(&mut self) -> Option<&mut NewItem> {
        self.draft.as_mut()
    }

    /// Save the draft as a new item and close the modal.
    ///
    /// Returns `Ok(None)` if the modal is not open.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::EmptyName`] when the draft has no name; the
    /// modal stays open with the draft untouched.
    pub fn save_item(&mut self) -> Result<Option<ItemId>, InventoryError> {
        let Some(draft) = self.draft.as_ref() else {
            return Ok(None);
        };
        let id = self.store.add(draft)?;
        self.draft = None;
        Ok(Some(id))
    }

    /// Delete an item from the stock table.
    pub fn delete_item(&mut self, id: ItemId) -> Option<InventoryItem> {
        self.store.remove(id)
    }

    // =========================================================================
    // Analysis
    // =========================================================================

    /// Start a new analysis, superseding any outstanding one.
    pub fn begin_analysis(&mut self) -> AnalysisRequest {
        self.last_ticket += 1;
        let ticket = AnalysisTicket(self.last_ticket);
        self.analysis = AnalysisState::Analyzing { ticket };
        AnalysisRequest {
            ticket,
            snapshot: self.store.snapshot(),
        }
    }

    /// Apply a finished analysis if it belongs to the latest request.
    ///
    /// On success the advice panel becomes the active tab.
    pub fn complete_analysis(
        &mut self,
        ticket: AnalysisTicket,
        report: AdvisoryReport,
    ) -> Completion {
        if ticket.0 != self.last_ticket {
            return Completion::Stale;
        }
        self.analysis = AnalysisState::Ready { report };
        self.tab = Tab::Advisor;
        Completion::Applied
    }

    #[must_use]
    pub const fn analysis(&self) -> &AnalysisState {
        &self.analysis
    }

    #[must_use]
    pub const fn is_analyzing(&self) -> bool {
        matches!(self.analysis, AnalysisState::Analyzing { .. })
    }

    /// The report currently on display, if any.
    #[must_use]
    pub const fn report(&self) -> Option<&AdvisoryReport> {
        match &self.analysis {
            AnalysisState::Ready { report } => Some(report),
            _ => None,
        }
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    #[must_use]
    pub fn dashboard(&self) -> DashboardSummary {
        DashboardSummary {
            low_stock_count: self.store.low_stock().count(),
            top_seller: self.store.top_seller().map(|item| item.name.clone()),
            preview: self
                .store
                .items()
                .iter()
                .take(DASHBOARD_PREVIEW_LEN)
                .map(|item| HealthRow {
                    id: item.id,
                    name: item.name.clone(),
                    category: item.category.clone(),
                    current_stock: item.current_stock,
                    level: item.stock_level(),
                })
                .collect(),
        }
    }
}

/// The add-item form's initial values.
fn blank_draft() -> NewItem {
    NewItem::named("")
        .category(DEFAULT_CATEGORY)
        .current_stock(DEFAULT_CURRENT_STOCK)
        .minimum_stock(DEFAULT_MINIMUM_STOCK)
        .average_daily_sales(DEFAULT_AVERAGE_DAILY_SALES)
        .today_sales(DEFAULT_TODAY_SALES)
}
