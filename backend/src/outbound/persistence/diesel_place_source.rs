//! PostgreSQL-backed curated and partner place sources.
//!
//! Both stores share one column layout, so a single adapter serves either
//! table. Filters are pushed down into SQL; the domain never sees rows.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use super::diesel_helpers::{contains_pattern, map_diesel_error, map_pool_error, sql_limit};
use super::models::{PartnerPlaceRow, PlaceRow};
use super::pool::DbPool;
use super::schema::{partner_places, places};
use crate::domain::{SortMode, SourceKind};
use crate::domain::ports::{PlaceSource, PlaceSourceError, PlaceSourceQuery, SourcePage};

/// Default cap on rows fetched per source call.
pub const DEFAULT_FETCH_LIMIT: usize = 500;

/// Build the filtered, boxed query for one place table.
///
/// Expanded twice per call: once for the page of rows and once for the
/// matching count.
macro_rules! filtered_places {
    ($table:ident, $query:expr) => {{
        let query: &PlaceSourceQuery = $query;
        let mut boxed = $table::table
            .filter($table::is_active.eq(true))
            .into_boxed::<Pg>();
        if let Some(city) = query.city.as_deref() {
            boxed = boxed.filter($table::city.ilike(contains_pattern(city)));
        }
        if let Some(category) = query.category {
            boxed = boxed.filter($table::category.eq(category.as_str()));
        }
        if let Some(text) = query.text.as_deref() {
            let pattern = contains_pattern(text);
            boxed = boxed.filter(
                $table::name
                    .ilike(pattern.clone())
                    .or($table::description.ilike(pattern.clone()))
                    .or($table::address.ilike(pattern)),
            );
        }
        if let Some(min) = query.min_rating {
            boxed = boxed.filter($table::rating_average.assume_not_null().ge(min));
        }
        boxed
    }};
}

/// Order a filtered query by the requested sort so the row cap keeps the
/// best matches.
///
/// Random sampling uses identifier order: the sampled subset must not change
/// between the pages of one sample. Distance uses squared equirectangular
/// offsets, which order the same way as great-circle distance at city scale.
macro_rules! ordered_places {
    ($table:ident, $boxed:expr, $query:expr) => {{
        let query: &PlaceSourceQuery = $query;
        let boxed = $boxed;
        match (query.random, query.sort, query.user_location) {
            (true, _, _) => boxed.order($table::id.asc()),
            (false, SortMode::Rating, _) => boxed.order((
                $table::rating_average.desc().nulls_last(),
                $table::rating_count.desc(),
            )),
            (false, SortMode::Popular, _) => boxed.order((
                $table::rating_count.desc(),
                $table::rating_average.desc().nulls_last(),
            )),
            (false, SortMode::Distance, Some(origin)) => {
                let lat_offset = $table::latitude - origin.latitude();
                let lng_offset = ($table::longitude - origin.longitude())
                    * origin.latitude().to_radians().cos();
                boxed.order(
                    (lat_offset.clone() * lat_offset + lng_offset.clone() * lng_offset)
                        .asc()
                        .nulls_last(),
                )
            }
            (false, SortMode::Recent | SortMode::Distance, _) => {
                boxed.order($table::created_at.desc())
            }
        }
    }};
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlaceTable {
    Places,
    PartnerPlaces,
}

impl PlaceTable {
    fn name(self) -> &'static str {
        match self {
            Self::Places => "places",
            Self::PartnerPlaces => "partner_places",
        }
    }
}

/// Diesel-backed implementation of the place source port.
#[derive(Clone)]
pub struct DieselPlaceSource {
    pool: DbPool,
    table: PlaceTable,
    fetch_limit: usize,
}

impl DieselPlaceSource {
    /// Source over the curated `places` table.
    pub fn curated(pool: DbPool, fetch_limit: usize) -> Self {
        Self {
            pool,
            table: PlaceTable::Places,
            fetch_limit: fetch_limit.max(1),
        }
    }

    /// Source over the `partner_places` table.
    pub fn partner(pool: DbPool, fetch_limit: usize) -> Self {
        Self {
            pool,
            table: PlaceTable::PartnerPlaces,
            fetch_limit: fetch_limit.max(1),
        }
    }

    fn row_cap(&self, query: &PlaceSourceQuery) -> i64 {
        sql_limit(query.limit.map_or(self.fetch_limit, |limit| {
            limit.min(self.fetch_limit)
        }))
    }

    async fn load_curated(
        &self,
        query: &PlaceSourceQuery,
    ) -> Result<(Vec<PlaceRow>, i64), PlaceSourceError> {
        let table = self.table.name();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PlaceRow> = ordered_places!(places, filtered_places!(places, query), query)
            .select(PlaceRow::as_select())
            .limit(self.row_cap(query))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, table))?;
        let total: i64 = filtered_places!(places, query)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, table))?;
        Ok((rows, total))
    }

    async fn load_partner(
        &self,
        query: &PlaceSourceQuery,
    ) -> Result<(Vec<PlaceRow>, i64), PlaceSourceError> {
        let table = self.table.name();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let filtered = filtered_places!(partner_places, query);
        let ordered = if query.sort == SortMode::Recent && !query.random {
            filtered.order((
                partner_places::priority_rank.asc(),
                partner_places::created_at.desc(),
            ))
        } else {
            ordered_places!(partner_places, filtered, query)
                .then_order_by(partner_places::priority_rank.asc())
        };
        let rows: Vec<PartnerPlaceRow> = ordered
            .select(PartnerPlaceRow::as_select())
            .limit(self.row_cap(query))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, table))?;
        let total: i64 = filtered_places!(partner_places, query)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, table))?;
        Ok((rows.into_iter().map(PlaceRow::from).collect(), total))
    }
}

#[async_trait]
impl PlaceSource for DieselPlaceSource {
    fn kind(&self) -> SourceKind {
        match self.table {
            PlaceTable::Places => SourceKind::Curated,
            PlaceTable::PartnerPlaces => SourceKind::Partner,
        }
    }

    async fn fetch(&self, query: &PlaceSourceQuery) -> Result<SourcePage, PlaceSourceError> {
        let (rows, total) = match self.table {
            PlaceTable::Places => self.load_curated(query).await?,
            PlaceTable::PartnerPlaces => self.load_partner(query).await?,
        };
        let kind = self.kind();
        let records: Vec<_> = rows.into_iter().map(|row| row.into_record(kind)).collect();
        let total = usize::try_from(total).unwrap_or(0).max(records.len());
        debug!(
            table = self.table.name(),
            returned = records.len(),
            total,
            "loaded places"
        );
        Ok(SourcePage { records, total })
    }
}
