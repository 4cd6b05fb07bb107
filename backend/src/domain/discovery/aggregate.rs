//! Fan-in of per-source outcomes into one flat sequence.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::ports::{PlaceSourceError, SourcePage};
use crate::domain::{PlaceRecord, SourceKind};

/// Totals reported by each source before de-duplication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCounts {
    /// Curated catalogue.
    pub places: usize,
    /// Partner store.
    pub partners: usize,
    /// Live maps provider.
    pub google: usize,
}

impl SourceCounts {
    fn record(&mut self, source: SourceKind, total: usize) {
        match source {
            SourceKind::Curated => self.places = total,
            SourceKind::Partner => self.partners = total,
            SourceKind::Live => self.google = total,
        }
    }
}

/// Result of one consulted source.
pub type SourceOutcome = (SourceKind, Result<SourcePage, PlaceSourceError>);

/// Merged records plus bookkeeping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    /// Every record from every successful source, in outcome order.
    pub records: Vec<PlaceRecord>,
    /// Per-source totals.
    pub counts: SourceCounts,
    /// Number of sources consulted.
    pub consulted: usize,
    /// Number of consulted sources that failed.
    pub failed: usize,
}

impl Aggregate {
    /// Whether at least one source was consulted and all of them failed.
    pub fn total_failure(&self) -> bool {
        self.consulted > 0 && self.failed == self.consulted
    }
}

/// Concatenate outcomes, stamping provenance from the producing source.
///
/// A failed source is logged and contributes nothing.
pub fn aggregate(outcomes: impl IntoIterator<Item = SourceOutcome>) -> Aggregate {
    let mut merged = Aggregate::default();
    for (source, outcome) in outcomes {
        merged.consulted += 1;
        match outcome {
            Ok(page) => {
                merged.counts.record(source, page.total);
                merged
                    .records
                    .extend(page.records.into_iter().map(|mut record| {
                        record.provenance = source.into();
                        record
                    }));
            }
            Err(error) => {
                merged.failed += 1;
                warn!(source = source.label(), %error, "place source unavailable");
            }
        }
    }
    info!(
        places = merged.counts.places,
        partners = merged.counts.partners,
        google = merged.counts.google,
        failed = merged.failed,
        "aggregated place sources"
    );
    merged
}
