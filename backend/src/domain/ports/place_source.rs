//! Driven port for the place sources feeding discovery.
//!
//! Every source answers the same filter contract and returns records already
//! normalised into [`PlaceRecord`] and tagged with its [`SourceKind`]. Sources
//! never rank, deduplicate, or paginate across each other.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::discovery::rank;
use crate::domain::text::normalize_name;
use crate::domain::{Coordinates, PlaceCategory, PlaceRecord, SortMode, SourceKind};

/// Filter subset handed to every source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceSourceQuery {
    /// City filter, matched case-insensitively.
    pub city: Option<String>,
    /// Exact category.
    pub category: Option<PlaceCategory>,
    /// Free text matched against name, address, and tags.
    pub text: Option<String>,
    /// Minimum rating average.
    pub min_rating: Option<f64>,
    /// Where the user is; required by the live source.
    pub user_location: Option<Coordinates>,
    /// Search radius around `user_location`, in metres.
    pub radius_m: Option<u32>,
    /// Cap on returned records. Sources apply their own default when absent.
    pub limit: Option<usize>,
    /// Order applied before `limit`, so a capped source keeps its best
    /// matches for the requested ranking.
    pub sort: SortMode,
    /// Random sampling requested. Capped sources return a stable identifier
    /// order so every page of one sample draws from the same subset.
    pub random: bool,
}

impl PlaceSourceQuery {
    /// Whether `record` satisfies every filter in this query.
    ///
    /// Location and radius are not applied here; distance filtering happens
    /// after ranking.
    pub fn matches(&self, record: &PlaceRecord) -> bool {
        let city_ok = self.city.as_deref().is_none_or(|city| {
            record
                .city
                .as_deref()
                .is_some_and(|value| value.to_lowercase().contains(&city.to_lowercase()))
        });
        let category_ok = self
            .category
            .is_none_or(|category| record.category == category);
        let rating_ok = self
            .min_rating
            .is_none_or(|min| record.rating.is_some_and(|rating| rating.average >= min));
        let text_ok = self.text.as_deref().is_none_or(|text| {
            let needle = normalize_name(text);
            [record.name.as_str(), record.address.as_str()]
                .into_iter()
                .chain(record.tags.iter().map(String::as_str))
                .any(|hay| normalize_name(hay).contains(&needle))
        });
        city_ok && category_ok && rating_ok && text_ok
    }

    /// Put `records` into the order a source must apply before its cap.
    pub fn order(&self, records: &mut [PlaceRecord]) {
        if self.random {
            records.sort_by(|a, b| a.id.cmp(&b.id));
        } else {
            rank(records, self.sort, self.user_location);
        }
    }
}

/// One source's answer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourcePage {
    /// Normalised records.
    pub records: Vec<PlaceRecord>,
    /// Matches the source holds, which may exceed `records.len()`.
    pub total: usize,
}

impl SourcePage {
    /// Page whose total equals its record count.
    pub fn complete(records: Vec<PlaceRecord>) -> Self {
        let total = records.len();
        Self { records, total }
    }
}

define_port_error! {
    /// Errors surfaced while querying a place source.
    pub enum PlaceSourceError {
        /// Backing store could not be reached.
        Connection { message: String } => "place source connection failed: {message}",
        /// Backing store rejected or failed the query.
        Query { message: String } => "place source query failed: {message}",
        /// Call exceeded its deadline.
        Timeout { message: String } => "place source timed out: {message}",
        /// Third-party provider failed.
        Upstream { message: String } => "place source upstream failure: {message}",
    }
}

/// Port for one place source.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaceSource: Send + Sync {
    /// Provenance stamped on every record this source returns.
    fn kind(&self) -> SourceKind;

    /// Fetch records matching `query`.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use waypoint::domain::SourceKind;
    /// use waypoint::domain::ports::{FixturePlaceSource, PlaceSource, PlaceSourceQuery};
    ///
    /// let source = FixturePlaceSource::new(SourceKind::Curated, Vec::new());
    /// let page = source.fetch(&PlaceSourceQuery::default()).await?;
    /// assert!(page.records.is_empty());
    /// # Ok::<(), waypoint::domain::ports::PlaceSourceError>(())
    /// ```
    async fn fetch(&self, query: &PlaceSourceQuery) -> Result<SourcePage, PlaceSourceError>;
}

/// In-memory source filtering a fixed record list.
///
/// Records are re-tagged with the fixture's kind so callers can reuse one
/// list across sources.
#[derive(Debug, Clone)]
pub struct FixturePlaceSource {
    kind: SourceKind,
    records: Vec<PlaceRecord>,
}

impl FixturePlaceSource {
    /// Source of `kind` serving `records`.
    pub fn new(kind: SourceKind, records: Vec<PlaceRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|mut record| {
                record.provenance = kind.into();
                record
            })
            .collect();
        Self { kind, records }
    }

    /// Source with no records.
    pub fn empty(kind: SourceKind) -> Self {
        Self::new(kind, Vec::new())
    }
}

#[async_trait]
impl PlaceSource for FixturePlaceSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn fetch(&self, query: &PlaceSourceQuery) -> Result<SourcePage, PlaceSourceError> {
        let mut matching: Vec<_> = self
            .records
            .iter()
            .filter(|record| query.matches(record))
            .cloned()
            .collect();
        query.order(&mut matching);
        let total = matching.len();
        let records = match query.limit {
            Some(limit) => matching.into_iter().take(limit).collect(),
            None => matching,
        };
        Ok(SourcePage { records, total })
    }
}
