//! Advisory report returned by an inventory analysis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message shown when the advisory service could not be reached.
pub const UNAVAILABLE_ADVICE: &str = "KiranaMitra analysis is temporarily unavailable. \
Your stock list is unchanged; please ask again in a little while.";

/// How a report was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSource {
    /// All four sections were found in the model's reply.
    Generated,
    /// The reply lacked the expected sections; it is kept verbatim as advice.
    Unstructured,
    /// The analysis failed; only an explanatory message is present.
    Degraded,
}

/// Structured restocking advice for the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryReport {
    /// Overall shop health summary.
    pub status: String,
    /// Recommended restocking actions.
    pub actions: String,
    /// Items selling faster than they are replenished.
    pub fast_sellers: String,
    /// Free-form narrative guidance.
    pub advice: String,
    pub source: ReportSource,
    pub generated_at: DateTime<Utc>,
}

impl AdvisoryReport {
    /// A report built from the four parsed sections.
    #[must_use]
    pub fn generated(
        status: impl Into<String>,
        actions: impl Into<String>,
        fast_sellers: impl Into<String>,
        advice: impl Into<String>,
    ) -> Self {
        Self {
            status: status.into(),
            actions: actions.into(),
            fast_sellers: fast_sellers.into(),
            advice: advice.into(),
            source: ReportSource::Generated,
            generated_at: Utc::now(),
        }
    }

    /// A report whose raw reply could not be sectioned.
    #[must_use]
    pub fn unstructured(raw: impl Into<String>) -> Self {
        Self {
            status: String::new(),
            actions: String::new(),
            fast_sellers: String::new(),
            advice: raw.into(),
            source: ReportSource::Unstructured,
            generated_at: Utc::now(),
        }
    }

    /// The fallback report used when analysis is unavailable.
    #[must_use]
    pub fn degraded() -> Self {
        Self {
            status: String::new(),
            actions: String::new(),
            fast_sellers: String::new(),
            advice: UNAVAILABLE_ADVICE.to_owned(),
            source: ReportSource::Degraded,
            generated_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.source == ReportSource::Degraded
    }
}
