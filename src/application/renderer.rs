//! Ang renderer: fetch, normalize, tokenize, and swap container content.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use metrics::counter;
use tracing::{debug, error, info, instrument};

use crate::application::envelope::{ResponseEnvelope, normalize_lines};
use crate::application::ports::{AngProvider, Container, LAST_ANG_KEY, LineEnrichment, Storage};
use crate::domain::ang::AngNumber;
use crate::presentation::views::{
    AngLinesTemplate, EmptyTemplate, ErrorTemplate, FALLBACK_ERROR_MARKUP, LoadingTemplate,
    render_markup,
};

pub const METRIC_RENDER_TOTAL: &str = "gurshabad_render_total";
pub const METRIC_LINES_SKIPPED_TOTAL: &str = "gurshabad_lines_skipped_total";

/// What a render left in its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered {
        ang: AngNumber,
        lines: usize,
        skipped: usize,
    },
    Empty {
        ang: AngNumber,
    },
    Failed {
        ang: AngNumber,
    },
    /// A newer render on the same pane started before this one's fetch resolved.
    Superseded {
        ang: AngNumber,
    },
}

impl RenderOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            RenderOutcome::Rendered { .. } => "rendered",
            RenderOutcome::Empty { .. } => "empty",
            RenderOutcome::Failed { .. } => "failed",
            RenderOutcome::Superseded { .. } => "superseded",
        }
    }
}

/// A container plus the sequence stamp that decides which render owns it.
#[derive(Debug, Default)]
pub struct RenderPane<C> {
    container: C,
    sequence: AtomicU64,
}

impl<C: Container> RenderPane<C> {
    pub fn new(container: C) -> Self {
        Self {
            container,
            sequence: AtomicU64::new(0),
        }
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn into_container(self) -> C {
        self.container
    }

    fn begin(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, stamp: u64) -> bool {
        self.sequence.load(Ordering::SeqCst) == stamp
    }
}

#[derive(Clone)]
pub struct AngRenderer {
    provider: Arc<dyn AngProvider>,
    storage: Arc<dyn Storage>,
    enrichment: Option<Arc<dyn LineEnrichment>>,
}

impl AngRenderer {
    pub fn new(provider: Arc<dyn AngProvider>, storage: Arc<dyn Storage>) -> Self {
        Self {
            provider,
            storage,
            enrichment: None,
        }
    }

    pub fn with_enrichment(mut self, enrichment: Arc<dyn LineEnrichment>) -> Self {
        self.enrichment = Some(enrichment);
        self
    }

    /// Render `ang` into `pane`. Never fails: every path ends in exactly one
    /// visible container state.
    #[instrument(skip(self, pane))]
    pub async fn render<C: Container>(&self, ang: AngNumber, pane: &RenderPane<C>) -> RenderOutcome {
        let stamp = pane.begin();
        pane.container.replace(
            render_markup(LoadingTemplate { ang })
                .unwrap_or_else(|_| format!("Loading Ang {ang}...")),
        );

        let fetched = self.provider.fetch_ang(ang).await;

        if !pane.is_current(stamp) {
            debug!(stamp, "discarding stale ang response");
            return record(RenderOutcome::Superseded { ang });
        }

        let payload = match fetched {
            Ok(payload) => payload,
            Err(err) => {
                error!(error = %err, "ang load error");
                pane.container.replace(error_markup());
                return record(RenderOutcome::Failed { ang });
            }
        };

        let Some(envelope) = ResponseEnvelope::decode(&payload) else {
            info!("no content found for ang");
            pane.container.replace(
                render_markup(EmptyTemplate { ang })
                    .unwrap_or_else(|_| format!("No content found for Ang {ang}")),
            );
            return record(RenderOutcome::Empty { ang });
        };

        let normalized = normalize_lines(envelope.lines());
        let markup = match render_markup(AngLinesTemplate::new(ang, &normalized.records)) {
            Ok(markup) => markup,
            Err(err) => {
                error!(error = %err, detail = %err.error, "ang markup rendering failed");
                pane.container.replace(error_markup());
                return record(RenderOutcome::Failed { ang });
            }
        };
        pane.container.replace(markup);

        if let Some(enrichment) = &self.enrichment {
            enrichment.enrich(ang, &normalized.records);
        }

        if let Err(err) = self.storage.set(LAST_ANG_KEY, &ang.to_string()) {
            debug!(error = %err, "failed to persist last viewed ang");
        }

        if normalized.skipped > 0 {
            counter!(METRIC_LINES_SKIPPED_TOTAL).increment(normalized.skipped as u64);
        }
        info!(
            lines = normalized.records.len(),
            skipped = normalized.skipped,
            "ang rendered"
        );

        record(RenderOutcome::Rendered {
            ang,
            lines: normalized.records.len(),
            skipped: normalized.skipped,
        })
    }
}

fn error_markup() -> String {
    render_markup(ErrorTemplate).unwrap_or_else(|_| FALLBACK_ERROR_MARKUP.to_string())
}

fn record(outcome: RenderOutcome) -> RenderOutcome {
    counter!(METRIC_RENDER_TOTAL, "outcome" => outcome.label()).increment(1);
    outcome
}
