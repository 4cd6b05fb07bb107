//! Fuzzy join of resolved locations back onto itinerary activities.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{AddressRejectList, GeocodeResult};
use crate::domain::text::{contains_either_way, normalize_name};
use crate::domain::{Coordinates, Photo, Rating};

/// One scheduled stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Time of day as written, e.g. "08:30".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// What happens.
    pub title: String,
    /// Free-text location.
    #[serde(default)]
    pub location: String,
    /// Longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Resolved location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    /// Provider place identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    /// Rating summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    /// Photos.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<Photo>,
}

/// One day of activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDay {
    /// One-based day number.
    pub day: u32,
    /// Day heading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Activities in schedule order.
    #[serde(default)]
    pub activities: Vec<Activity>,
}

/// Structured trip plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    /// Trip destination, used to disambiguate locations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// Days in order.
    #[serde(default)]
    pub days: Vec<ItineraryDay>,
}

impl Itinerary {
    /// Distinct non-blank activity locations, in first-appearance order.
    ///
    /// Locations that differ only in case, punctuation, or spacing collapse
    /// onto their first spelling.
    pub fn distinct_locations(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut locations = Vec::new();
        for activity in self.days.iter().flat_map(|day| &day.activities) {
            let location = activity.location.trim();
            let key = normalize_name(location);
            if !key.is_empty() && seen.insert(key) {
                locations.push(location.to_owned());
            }
        }
        locations
    }
}

/// Decides whether a resolved candidate describes an activity's location.
pub trait LocationMatcher: Send + Sync {
    /// Whether `candidate` matches `location`.
    fn matches(&self, location: &str, candidate: &GeocodeResult) -> bool;
}

/// Normalised substring match in either direction against the candidate's
/// input address, point-of-interest name, or formatted address.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringLocationMatcher;

impl LocationMatcher for SubstringLocationMatcher {
    fn matches(&self, location: &str, candidate: &GeocodeResult) -> bool {
        std::iter::once(candidate.address.as_str())
            .chain(candidate.name.as_deref())
            .chain(candidate.formatted_address.as_deref())
            .any(|text| contains_either_way(text, location))
    }
}

/// Counts from one enrichment pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentSummary {
    /// Distinct locations looked up.
    pub locations: usize,
    /// Locations that resolved to coordinates.
    pub resolved: usize,
    /// Activities that received enrichment.
    pub matched_activities: usize,
    /// Activities left without coordinates.
    pub unmatched_activities: usize,
}

/// Attaches resolved candidates onto activities.
///
/// Placeholder locations stay unenriched: a "hotel" activity never borrows
/// the coordinates of some other hotel in the plan.
#[derive(Clone)]
pub struct PlaceEnricher {
    matcher: Arc<dyn LocationMatcher>,
    reject_list: AddressRejectList,
}

impl Default for PlaceEnricher {
    fn default() -> Self {
        Self::new(Arc::new(SubstringLocationMatcher))
    }
}

impl PlaceEnricher {
    /// Enricher using `matcher` and the default placeholder list.
    pub fn new(matcher: Arc<dyn LocationMatcher>) -> Self {
        Self {
            matcher,
            reject_list: AddressRejectList::default(),
        }
    }

    /// Replace the placeholder list, normally with the resolver's.
    #[must_use]
    pub fn with_reject_list(mut self, reject_list: AddressRejectList) -> Self {
        self.reject_list = reject_list;
        self
    }

    /// Enrich every activity in place and return `(matched, unmatched)`.
    ///
    /// An exact normalised address match wins over a fuzzy one. Unresolved
    /// candidates are ignored and activities never disappear.
    pub fn enrich(&self, itinerary: &mut Itinerary, candidates: &[GeocodeResult]) -> (usize, usize) {
        let resolved: Vec<&GeocodeResult> = candidates
            .iter()
            .filter(|candidate| candidate.is_resolved())
            .collect();
        let mut matched = 0;
        let mut unmatched = 0;
        for day in &mut itinerary.days {
            for activity in &mut day.activities {
                match self.best_match(&activity.location, &resolved) {
                    Some(candidate) => {
                        attach(activity, candidate);
                        matched += 1;
                    }
                    None => {
                        unmatched += 1;
                        warn!(
                            day = day.day,
                            location = %activity.location,
                            "no resolved candidate for activity"
                        );
                    }
                }
            }
        }
        (matched, unmatched)
    }

    fn best_match<'a>(
        &self,
        location: &str,
        candidates: &[&'a GeocodeResult],
    ) -> Option<&'a GeocodeResult> {
        if self.reject_list.is_rejected(location) {
            return None;
        }
        let wanted = normalize_name(location);
        candidates
            .iter()
            .find(|candidate| normalize_name(&candidate.address) == wanted)
            .or_else(|| {
                candidates
                    .iter()
                    .find(|candidate| self.matcher.matches(location, candidate))
            })
            .copied()
    }
}

fn attach(activity: &mut Activity, candidate: &GeocodeResult) {
    activity.coordinates = candidate.coordinates;
    activity.place_id.clone_from(&candidate.place_id);
    activity.rating = candidate.rating;
    activity.photos.clone_from(&candidate.photos);
}
