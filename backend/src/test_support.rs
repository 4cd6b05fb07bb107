//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).

pub mod clock {
    //! Controllable clock for TTL and sampling-window tests.

    use std::sync::Mutex;
    use std::time::Duration;

    use chrono::{DateTime, Local, TimeDelta, Utc};
    use mockable::Clock;

    /// Clock whose current instant only moves when told to.
    pub struct MutableClock(Mutex<DateTime<Utc>>);

    impl MutableClock {
        /// Clock frozen at `now`.
        pub fn new(now: DateTime<Utc>) -> Self {
            Self(Mutex::new(now))
        }

        /// Move the clock forward by `delta`.
        pub fn advance(&self, delta: Duration) {
            let delta = match TimeDelta::from_std(delta) {
                Ok(delta) => delta,
                Err(error) => {
                    panic!("failed to convert Duration to TimeDelta: {error}; delta={delta:?}")
                }
            };
            *self.lock_clock() += delta;
        }

        /// Move the clock forward by whole seconds.
        pub fn advance_seconds(&self, seconds: i64) {
            *self.lock_clock() += TimeDelta::seconds(seconds);
        }

        fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
            match self.0.lock() {
                Ok(guard) => guard,
                Err(_) => panic!("clock mutex"),
            }
        }
    }

    impl Clock for MutableClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.lock_clock()
        }
    }
}

pub mod places {
    //! Builders for place records.

    use chrono::{DateTime, Utc};

    use crate::domain::{Coordinates, PlaceCategory, PlaceRecord, Rating, SourceKind};

    /// Fluent builder over [`PlaceRecord`].
    #[derive(Debug, Clone)]
    pub struct PlaceBuilder(PlaceRecord);

    impl PlaceBuilder {
        /// Restaurant with the given identity and provenance.
        pub fn new(id: &str, name: &str, source: SourceKind) -> Self {
            Self(PlaceRecord::new(id, name, PlaceCategory::Restaurant, source))
        }

        /// Set the category.
        pub fn category(mut self, category: PlaceCategory) -> Self {
            self.0.category = category;
            self
        }

        /// Set the city.
        pub fn city(mut self, city: &str) -> Self {
            self.0.city = Some(city.to_owned());
            self
        }

        /// Set the address.
        pub fn address(mut self, address: &str) -> Self {
            self.0.address = address.to_owned();
            self
        }

        /// Place the record at `(lat, lng)`.
        pub fn at(mut self, lat: f64, lng: f64) -> Self {
            let coordinates = match Coordinates::try_new(lat, lng) {
                Ok(coordinates) => coordinates,
                Err(error) => panic!("invalid fixture coordinates: {error}"),
            };
            self.0.coordinates = Some(coordinates);
            self
        }

        /// Set the rating summary.
        pub fn rated(mut self, average: f64, count: u32) -> Self {
            self.0.rating = Some(Rating { average, count });
            self
        }

        /// Set the insertion time.
        pub fn created(mut self, at: DateTime<Utc>) -> Self {
            self.0.created_at = Some(at);
            self
        }

        /// Set the maps-provider identifier.
        pub fn provider_id(mut self, place_id: &str) -> Self {
            self.0.provider_place_id = Some(place_id.to_owned());
            self
        }

        /// Finish building.
        pub fn build(self) -> PlaceRecord {
            self.0
        }
    }
}

pub mod geocoding {
    //! Scripted maps provider that records every call.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::domain::ports::{
        GeocodeHit, GeocodeProvider, GeocodeProviderError, NearbyPlace, NearbySearchRequest,
        PlaceDetails,
    };

    /// One recorded provider call.
    #[derive(Debug, Clone, PartialEq)]
    pub enum ProviderCall {
        /// Forward geocode of an address.
        Geocode(String),
        /// Proximity search.
        Nearby(NearbySearchRequest),
        /// Details lookup.
        Details(String),
    }

    /// Provider answering from fixed tables.
    #[derive(Debug, Default)]
    pub struct ScriptedGeocodeProvider {
        geocodes: HashMap<String, GeocodeHit>,
        nearby: Vec<NearbyPlace>,
        details: HashMap<String, PlaceDetails>,
        failing_details: bool,
        calls: Mutex<Vec<ProviderCall>>,
    }

    impl ScriptedGeocodeProvider {
        /// Provider with no scripted answers.
        pub fn new() -> Self {
            Self::default()
        }

        /// Resolve `address` to `hit`.
        pub fn with_geocode(mut self, address: &str, hit: GeocodeHit) -> Self {
            self.geocodes.insert(address.to_owned(), hit);
            self
        }

        /// Return `places` from every proximity search.
        pub fn with_nearby(mut self, places: Vec<NearbyPlace>) -> Self {
            self.nearby = places;
            self
        }

        /// Answer details for `place_id`.
        pub fn with_details(mut self, place_id: &str, details: PlaceDetails) -> Self {
            self.details.insert(place_id.to_owned(), details);
            self
        }

        /// Make every details lookup fail.
        pub fn with_failing_details(mut self) -> Self {
            self.failing_details = true;
            self
        }

        /// Calls received so far.
        pub fn calls(&self) -> Vec<ProviderCall> {
            self.lock_calls().clone()
        }

        fn record(&self, call: ProviderCall) {
            self.lock_calls().push(call);
        }

        fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<ProviderCall>> {
            match self.calls.lock() {
                Ok(guard) => guard,
                Err(_) => panic!("provider call log mutex"),
            }
        }
    }

    #[async_trait]
    impl GeocodeProvider for ScriptedGeocodeProvider {
        async fn geocode(
            &self,
            address: &str,
        ) -> Result<Option<GeocodeHit>, GeocodeProviderError> {
            self.record(ProviderCall::Geocode(address.to_owned()));
            Ok(self.geocodes.get(address).cloned())
        }

        async fn nearby_search(
            &self,
            request: &NearbySearchRequest,
        ) -> Result<Vec<NearbyPlace>, GeocodeProviderError> {
            self.record(ProviderCall::Nearby(request.clone()));
            Ok(self.nearby.clone())
        }

        async fn place_details(
            &self,
            place_id: &str,
        ) -> Result<Option<PlaceDetails>, GeocodeProviderError> {
            self.record(ProviderCall::Details(place_id.to_owned()));
            if self.failing_details {
                return Err(GeocodeProviderError::transport("scripted failure"));
            }
            Ok(self.details.get(place_id).cloned())
        }
    }
}

pub mod openapi {
    //! OpenAPI schema traversal helpers.

    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::{Object, Schema};

    /// Extract an `Object` schema, panicking with a diagnostic otherwise.
    pub fn unwrap_object_schema<'a>(schema: &'a RefOr<Schema>, name: &str) -> &'a Object {
        match schema {
            RefOr::T(Schema::Object(obj)) => obj,
            RefOr::Ref(reference) => {
                panic!(
                    "schema '{name}' is a $ref to '{}'; resolve the reference first",
                    reference.ref_location
                );
            }
            RefOr::T(Schema::Array(_)) => {
                panic!("schema '{name}' is an Array, not an Object");
            }
            _ => panic!("schema '{name}' has unexpected type"),
        }
    }
}
