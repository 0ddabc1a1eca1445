//! The advisory engine: snapshot in, report out.
//!
//! One analysis is one generation call. Every failure on the way (transport,
//! API error, timeout, empty reply) is logged and turned into a degraded
//! report, so [`AdvisoryEngine::analyze`] never fails.

use std::future::Future;
use std::time::Duration;

use kirana_mitra_core::{
    AdvisoryReport, AnalysisRequest, AnalysisTicket, InventorySnapshot, ReportSource,
};
use thiserror::Error;
use tracing::{Span, debug, field, info, instrument, warn};

use crate::config::{AdvisorConfig, DEFAULT_LANGUAGE, DEFAULT_TIMEOUT_SECS};
use crate::gemini::{GeminiClient, GeminiError};
use crate::prompt::{Prompt, build_prompt};
use crate::sections::parse_reply;

/// Why a generation produced no usable text.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Gemini error: {0}")]
    Gemini(#[from] GeminiError),

    /// Any other backend failure.
    #[error("Generator unavailable: {0}")]
    Unavailable(String),

    #[error("Generation timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Generator returned no text")]
    EmptyResponse,
}

/// Something that turns a prompt into raw reply text.
///
/// Implemented by [`GeminiClient`]; tests substitute their own.
pub trait TextGenerator: Send + Sync {
    /// Produce the full reply for one prompt.
    fn generate(
        &self,
        prompt: &Prompt,
    ) -> impl Future<Output = Result<String, GenerationError>> + Send;
}

impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError> {
        Ok(self.generate_text(&prompt.system, &prompt.user).await?)
    }
}

/// Produces advisory reports from inventory snapshots.
#[derive(Debug, Clone)]
pub struct AdvisoryEngine<G> {
    generator: G,
    timeout: Duration,
    language: String,
}

impl AdvisoryEngine<GeminiClient> {
    /// Build an engine backed by Gemini.
    ///
    /// # Errors
    ///
    /// Returns an error if the Gemini client cannot be created.
    pub fn from_config(config: &AdvisorConfig) -> Result<Self, GeminiError> {
        let client = GeminiClient::new(&config.gemini)?;
        Ok(Self::new(client)
            .with_timeout(config.timeout)
            .with_language(config.language.clone()))
    }
}

impl<G: TextGenerator> AdvisoryEngine<G> {
    /// Engine with the default timeout and reply language.
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    pub const fn generator(&self) -> &G {
        &self.generator
    }

    /// Prompt that [`AdvisoryEngine::analyze`] would send for `snapshot`.
    #[must_use]
    pub fn prompt_for(&self, snapshot: &InventorySnapshot) -> Prompt {
        build_prompt(snapshot, &self.language)
    }

    /// Analyze a snapshot.
    ///
    /// The snapshot is owned, so later store edits cannot reach an analysis in
    /// flight. Always returns a report; failures give
    /// [`AdvisoryReport::degraded`].
    #[instrument(skip_all, fields(items = snapshot.len(), outcome = field::Empty))]
    pub async fn analyze(&self, snapshot: InventorySnapshot) -> AdvisoryReport {
        match self.try_generate(&snapshot).await {
            Ok(text) => {
                let report = parse_reply(&text);
                if report.source == ReportSource::Unstructured {
                    warn!(reply_len = text.len(), "Reply missing expected headings");
                }
                Span::current().record("outcome", field::debug(report.source));
                info!("Analysis complete");
                report
            }
            Err(e) => {
                Span::current().record("outcome", field::debug(ReportSource::Degraded));
                warn!(error = %e, "Analysis unavailable");
                AdvisoryReport::degraded()
            }
        }
    }

    /// Analyze the snapshot of a session request, handing back its ticket.
    #[instrument(skip_all, fields(sequence = request.ticket.sequence()))]
    pub async fn analyze_request(&self, request: AnalysisRequest) -> (AnalysisTicket, AdvisoryReport) {
        let AnalysisRequest { ticket, snapshot } = request;
        (ticket, self.analyze(snapshot).await)
    }

    /// Run one bounded generation call and return the raw reply.
    ///
    /// # Errors
    ///
    /// Returns the generator's error, [`GenerationError::TimedOut`] when the
    /// call outlives the timeout, or [`GenerationError::EmptyResponse`] for a
    /// blank reply.
    pub async fn try_generate(&self, snapshot: &InventorySnapshot) -> Result<String, GenerationError> {
        let prompt = self.prompt_for(snapshot);
        debug!(prompt_len = prompt.user.len(), "Requesting analysis");

        let text = tokio::time::timeout(self.timeout, self.generator.generate(&prompt))
            .await
            .map_err(|_| GenerationError::TimedOut(self.timeout))??;

        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kirana_mitra_core::{InventoryStore, UNAVAILABLE_ADVICE};

    struct Canned(Result<&'static str, &'static str>);

    impl TextGenerator for Canned {
        async fn generate(&self, _prompt: &Prompt) -> Result<String, GenerationError> {
            self.0
                .map(str::to_string)
                .map_err(|e| GenerationError::Unavailable(e.to_string()))
        }
    }

    const REPLY: &str = "## STATUS\nok\n## ACTIONS\n- buy rice\n## FAST SELLERS\nRice\n## ADVICE\nsmile";

    #[tokio::test]
    async fn test_structured_reply() {
        let engine = AdvisoryEngine::new(Canned(Ok(REPLY)));
        let report = engine.analyze(InventoryStore::demo().snapshot()).await;
        assert_eq!(report.source, ReportSource::Generated);
        assert_eq!(report.actions, "- buy rice");
    }

    #[tokio::test]
    async fn test_failure_degrades() {
        let engine = AdvisoryEngine::new(Canned(Err("connection refused")));
        let report = engine.analyze(InventoryStore::demo().snapshot()).await;
        assert!(report.is_degraded());
        assert_eq!(report.advice, UNAVAILABLE_ADVICE);
    }

    #[tokio::test]
    async fn test_blank_reply_degrades() {
        let engine = AdvisoryEngine::new(Canned(Ok("  \n\t ")));
        let snapshot = InventoryStore::demo().snapshot();
        assert!(matches!(
            engine.try_generate(&snapshot).await,
            Err(GenerationError::EmptyResponse)
        ));
        assert!(engine.analyze(snapshot).await.is_degraded());
    }

    #[test]
    fn test_builder_settings() {
        let engine = AdvisoryEngine::new(Canned(Ok(REPLY)))
            .with_timeout(Duration::from_secs(5))
            .with_language("Marathi");
        assert_eq!(engine.timeout(), Duration::from_secs(5));
        assert_eq!(engine.language(), "Marathi");
        let prompt = engine.prompt_for(&InventoryStore::new().snapshot());
        assert!(prompt.system.contains("Reply in Marathi"));
    }
}
