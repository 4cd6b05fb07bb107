//! Discovery query model and its normalisation rules.
//!
//! Malformed input degrades to safe defaults instead of failing the request:
//! pagination is clamped, out-of-range ratings are clamped or dropped, and a
//! distance sort without a user location falls back to the default order.

use pagination::PageRequest;
use serde::{Deserialize, Serialize};

use super::{Coordinates, PlaceCategory, SourceKind};

/// Distance radius applied when a user location is present and the caller
/// did not pick one.
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 50.0;

/// Highest rating a place can hold.
pub const MAX_RATING: f64 = 5.0;

/// Ordering applied by the ranker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Highest rating first.
    Rating,
    /// Newest first.
    #[default]
    Recent,
    /// Most rated first.
    Popular,
    /// Nearest to the user first.
    Distance,
}

impl SortMode {
    /// Parse a query-string value, falling back to [`SortMode::Recent`].
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "rating" => Self::Rating,
            "popular" => Self::Popular,
            "distance" => Self::Distance,
            _ => Self::Recent,
        }
    }

    /// Stable lowercase identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rating => "rating",
            Self::Recent => "recent",
            Self::Popular => "popular",
            Self::Distance => "distance",
        }
    }
}

/// Which sources a discovery request consults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceScope {
    /// Curated, partner, and live sources.
    #[default]
    All,
    /// Curated catalogue only.
    Places,
    /// Partner store only.
    Partners,
    /// Live maps provider only.
    Google,
}

impl SourceScope {
    /// Parse a query-string value, falling back to [`SourceScope::All`].
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "places" => Self::Places,
            "partners" => Self::Partners,
            "google" => Self::Google,
            _ => Self::All,
        }
    }

    /// Stable lowercase identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Places => "places",
            Self::Partners => "partners",
            Self::Google => "google",
        }
    }

    /// Whether `source` takes part in this scope.
    pub fn includes(self, source: SourceKind) -> bool {
        matches!(
            (self, source),
            (Self::All, _)
                | (Self::Places, SourceKind::Curated)
                | (Self::Partners, SourceKind::Partner)
                | (Self::Google, SourceKind::Live)
        )
    }
}

/// Discovery request.
///
/// Build it with struct syntax, then call [`ExploreQuery::normalize`] before
/// handing it to the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExploreQuery {
    /// Requested page.
    pub page: PageRequest,
    /// City filter.
    pub city: Option<String>,
    /// Category filter.
    pub category: Option<PlaceCategory>,
    /// Free-text filter.
    pub text: Option<String>,
    /// Minimum rating average.
    pub min_rating: Option<f64>,
    /// Ordering.
    pub sort: SortMode,
    /// Where the user is.
    pub user_location: Option<Coordinates>,
    /// Sources to consult.
    pub scope: SourceScope,
    /// Distance radius in kilometres.
    pub max_distance_km: Option<f64>,
    /// Replace deterministic ordering with a seeded shuffle.
    pub random: bool,
    /// Set when a distance sort was requested without a user location.
    pub sort_downgraded: bool,
}

impl ExploreQuery {
    /// Apply the degradation rules. Idempotent.
    ///
    /// ```
    /// use waypoint::domain::{ExploreQuery, SortMode};
    ///
    /// let query = ExploreQuery {
    ///     sort: SortMode::Distance,
    ///     min_rating: Some(9.0),
    ///     city: Some("   ".to_owned()),
    ///     ..ExploreQuery::default()
    /// }
    /// .normalize();
    /// assert_eq!(query.sort, SortMode::Recent);
    /// assert!(query.sort_downgraded);
    /// assert_eq!(query.min_rating, Some(5.0));
    /// assert_eq!(query.city, None);
    /// ```
    #[must_use]
    pub fn normalize(mut self) -> Self {
        self.city = non_blank(self.city);
        self.text = non_blank(self.text);
        self.min_rating = self
            .min_rating
            .filter(|rating| rating.is_finite() && *rating > 0.0)
            .map(|rating| rating.min(MAX_RATING));
        self.max_distance_km = match self.user_location {
            Some(_) => Some(
                self.max_distance_km
                    .filter(|km| km.is_finite() && *km > 0.0)
                    .unwrap_or(DEFAULT_MAX_DISTANCE_KM),
            ),
            None => None,
        };
        if self.sort == SortMode::Distance && self.user_location.is_none() {
            self.sort = SortMode::Recent;
            self.sort_downgraded = true;
        }
        self
    }

    /// Stable serialisation of every filter in a fixed field order.
    ///
    /// Case and surrounding whitespace of free-text fields do not affect the
    /// output, so equivalent queries produce identical strings.
    pub fn canonical_form(&self) -> String {
        let mut out = format!(
            "page={}|limit={}|",
            self.page.page(),
            self.page.limit()
        );
        out.push_str(&self.sampling_form());
        out
    }

    /// Canonical form without pagination.
    ///
    /// Random sampling seeds derive from this so every page of one sampled
    /// result set shares a permutation.
    pub fn sampling_form(&self) -> String {
        format!(
            "city={}|category={}|q={}|minRating={}|sort={}|lat={}|lng={}|source={}|maxDistance={}|random={}",
            canonical_text(self.city.as_deref()),
            self.category.map_or("", PlaceCategory::as_str),
            canonical_text(self.text.as_deref()),
            canonical_float(self.min_rating),
            self.sort.as_str(),
            canonical_float(self.user_location.map(|c| c.latitude())),
            canonical_float(self.user_location.map(|c| c.longitude())),
            self.scope.as_str(),
            canonical_float(self.max_distance_km),
            self.random,
        )
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

fn canonical_text(value: Option<&str>) -> String {
    value.map(|raw| raw.trim().to_lowercase()).unwrap_or_default()
}

fn canonical_float(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.6}")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn location() -> Coordinates {
        Coordinates::try_new(10.346, 107.084).expect("valid coordinates")
    }

    #[rstest]
    #[case("rating", SortMode::Rating)]
    #[case("POPULAR", SortMode::Popular)]
    #[case("distance", SortMode::Distance)]
    #[case("newest", SortMode::Recent)]
    fn sort_mode_parses_leniently(#[case] raw: &str, #[case] expected: SortMode) {
        assert_eq!(SortMode::parse_lenient(raw), expected);
    }

    #[rstest]
    #[case(SourceScope::All, SourceKind::Live, true)]
    #[case(SourceScope::Places, SourceKind::Curated, true)]
    #[case(SourceScope::Places, SourceKind::Partner, false)]
    #[case(SourceScope::Partners, SourceKind::Partner, true)]
    #[case(SourceScope::Google, SourceKind::Curated, false)]
    fn scope_selects_sources(
        #[case] scope: SourceScope,
        #[case] source: SourceKind,
        #[case] expected: bool,
    ) {
        assert_eq!(scope.includes(source), expected);
    }

    #[rstest]
    fn distance_sort_with_location_is_kept() {
        let query = ExploreQuery {
            sort: SortMode::Distance,
            user_location: Some(location()),
            max_distance_km: Some(12.5),
            ..ExploreQuery::default()
        }
        .normalize();
        assert_eq!(query.sort, SortMode::Distance);
        assert!(!query.sort_downgraded);
        assert_eq!(query.max_distance_km, Some(12.5));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(-3.0))]
    fn located_query_gets_default_radius(#[case] raw: Option<f64>) {
        let query = ExploreQuery {
            user_location: Some(location()),
            max_distance_km: raw,
            ..ExploreQuery::default()
        }
        .normalize();
        assert_eq!(query.max_distance_km, Some(DEFAULT_MAX_DISTANCE_KM));
    }

    #[rstest]
    fn max_distance_without_location_is_dropped() {
        let query = ExploreQuery {
            max_distance_km: Some(5.0),
            ..ExploreQuery::default()
        }
        .normalize();
        assert_eq!(query.max_distance_km, None);
    }

    #[rstest]
    #[case(Some(-1.0), None)]
    #[case(Some(f64::NAN), None)]
    #[case(Some(4.0), Some(4.0))]
    #[case(Some(7.5), Some(5.0))]
    fn min_rating_is_clamped_or_dropped(
        #[case] raw: Option<f64>,
        #[case] expected: Option<f64>,
    ) {
        let query = ExploreQuery {
            min_rating: raw,
            ..ExploreQuery::default()
        }
        .normalize();
        assert_eq!(query.min_rating, expected);
    }

    #[rstest]
    fn normalize_is_idempotent() {
        let query = ExploreQuery {
            sort: SortMode::Distance,
            city: Some(" Vũng Tàu ".to_owned()),
            ..ExploreQuery::default()
        }
        .normalize();
        assert_eq!(query.clone().normalize(), query);
    }

    #[rstest]
    fn canonical_form_ignores_case_and_padding() {
        let a = ExploreQuery {
            city: Some("Vũng Tàu".to_owned()),
            text: Some("Seafood".to_owned()),
            ..ExploreQuery::default()
        }
        .normalize();
        let b = ExploreQuery {
            city: Some("  vũng tàu".to_owned()),
            text: Some("seafood ".to_owned()),
            ..ExploreQuery::default()
        }
        .normalize();
        assert_eq!(a.canonical_form(), b.canonical_form());
    }

    #[rstest]
    fn canonical_form_distinguishes_pages_but_sampling_form_does_not() {
        let first = ExploreQuery {
            page: PageRequest::new(1, 10),
            random: true,
            ..ExploreQuery::default()
        };
        let second = ExploreQuery {
            page: PageRequest::new(2, 10),
            ..first.clone()
        };
        assert_ne!(first.canonical_form(), second.canonical_form());
        assert_eq!(first.sampling_form(), second.sampling_form());
    }
}
