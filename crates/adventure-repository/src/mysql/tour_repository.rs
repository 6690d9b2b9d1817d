//! MySQL tour repository implementation.

use super::links::{self, LinkScope};
use crate::{traits::TourRepository, DatabasePoolInterface};
use adventure_core::{
    AdventureError, AdventureResult, CountryId, NewTour, Tour, TourId, TransportId,
};
use async_trait::async_trait;
use shaku::Component;
use sqlx::mysql::{MySql, MySqlConnection};
use sqlx::{FromRow, QueryBuilder};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

const SELECT_TOUR: &str =
    "SELECT t.id, t.name, t.description, t.duration_days, t.transport_id FROM tours t";

/// MySQL tour repository implementation.
///
/// The tour side owns the `tour_countries` link rows.
#[derive(Component, Clone)]
#[shaku(interface = TourRepository)]
pub struct MySqlTourRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlTourRepository {
    /// Creates a new MySQL tour repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }

    async fn with_countries(&self, rows: Vec<TourRow>) -> AdventureResult<Vec<Tour>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let links = links::fetch_links(self.pool.inner(), LinkScope::Tours(&ids)).await?;
        let mut countries = links::countries_by_tour(&links);

        Ok(rows
            .into_iter()
            .map(|row| {
                let country_ids = countries.remove(&TourId(row.id)).unwrap_or_default();
                row.into_tour(country_ids)
            })
            .collect())
    }

    async fn replace_links(
        conn: &mut MySqlConnection,
        tour_id: TourId,
        country_ids: &BTreeSet<CountryId>,
    ) -> AdventureResult<()> {
        sqlx::query("DELETE FROM tour_countries WHERE tour_id = ?")
            .bind(tour_id.into_inner())
            .execute(&mut *conn)
            .await?;

        let pairs: Vec<(TourId, CountryId)> = country_ids
            .iter()
            .map(|country_id| (tour_id, *country_id))
            .collect();
        links::insert_links(conn, &pairs).await
    }
}

/// Database row representation of a tour.
#[derive(Debug, FromRow)]
struct TourRow {
    id: i64,
    name: String,
    description: String,
    duration_days: i32,
    transport_id: Option<i64>,
}

impl TourRow {
    fn into_tour(self, country_ids: BTreeSet<CountryId>) -> Tour {
        Tour {
            id: TourId(self.id),
            name: self.name,
            description: self.description,
            duration_days: self.duration_days,
            country_ids,
            transport_id: self.transport_id.map(TransportId),
        }
    }
}

#[async_trait]
impl TourRepository for MySqlTourRepository {
    async fn find_all(&self) -> AdventureResult<Vec<Tour>> {
        debug!("Finding all tours");

        let rows = sqlx::query_as::<_, TourRow>(&format!("{SELECT_TOUR} ORDER BY t.id"))
            .fetch_all(self.pool.inner())
            .await?;

        self.with_countries(rows).await
    }

    async fn find_by_id(&self, id: TourId) -> AdventureResult<Option<Tour>> {
        debug!("Finding tour by id: {}", id);

        let row = sqlx::query_as::<_, TourRow>(&format!("{SELECT_TOUR} WHERE t.id = ?"))
            .bind(id.into_inner())
            .fetch_optional(self.pool.inner())
            .await?;

        match row {
            Some(row) => Ok(self.with_countries(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_all_by_id(&self, ids: &[TourId]) -> AdventureResult<Vec<Tour>> {
        debug!("Finding {} tours by id", ids.len());

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<i64> = ids.iter().map(|id| id.into_inner()).collect();
        let mut builder = QueryBuilder::<MySql>::new(SELECT_TOUR);
        builder.push(" WHERE t.id");
        links::push_id_list(&mut builder, &raw);
        builder.push(" ORDER BY t.id");

        let rows = builder
            .build_query_as::<TourRow>()
            .fetch_all(self.pool.inner())
            .await?;

        self.with_countries(rows).await
    }

    async fn find_by_transport(&self, transport_id: TransportId) -> AdventureResult<Vec<Tour>> {
        debug!("Finding tours by transport: {}", transport_id);

        let rows = sqlx::query_as::<_, TourRow>(&format!(
            "{SELECT_TOUR} WHERE t.transport_id = ? ORDER BY t.id"
        ))
        .bind(transport_id.into_inner())
        .fetch_all(self.pool.inner())
        .await?;

        self.with_countries(rows).await
    }

    async fn find_by_transport_name(&self, name: &str) -> AdventureResult<Vec<Tour>> {
        debug!("Finding tours by transport name: {}", name);

        let rows = sqlx::query_as::<_, TourRow>(&format!(
            "{SELECT_TOUR} JOIN transports tr ON tr.id = t.transport_id \
             WHERE tr.name = ? ORDER BY t.id"
        ))
        .bind(name)
        .fetch_all(self.pool.inner())
        .await?;

        self.with_countries(rows).await
    }

    async fn count(&self) -> AdventureResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tours")
            .fetch_one(self.pool.inner())
            .await?;

        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn save(&self, tour: &NewTour) -> AdventureResult<Tour> {
        debug!("Saving tour: {}", tour.name);

        let mut tx = self.pool.inner().begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO tours (name, description, duration_days, transport_id)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&tour.name)
        .bind(&tour.description)
        .bind(tour.duration_days)
        .bind(tour.transport_id.map(TransportId::into_inner))
        .execute(&mut *tx)
        .await?;

        let id = TourId(i64::try_from(result.last_insert_id()).unwrap_or_default());
        Self::replace_links(&mut tx, id, &tour.country_ids).await?;

        tx.commit().await?;

        Ok(tour.clone().into_tour(id))
    }

    async fn update(&self, tour: &Tour) -> AdventureResult<Tour> {
        debug!("Updating tour: {}", tour.id);

        let mut tx = self.pool.inner().begin().await?;

        let locked: Option<i64> =
            sqlx::query_scalar("SELECT id FROM tours WHERE id = ? FOR UPDATE")
                .bind(tour.id.into_inner())
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Err(AdventureError::not_found("Tour", tour.id));
        }

        sqlx::query(
            r#"
            UPDATE tours SET
                name = ?,
                description = ?,
                duration_days = ?,
                transport_id = ?
            WHERE id = ?
            "#,
        )
        .bind(&tour.name)
        .bind(&tour.description)
        .bind(tour.duration_days)
        .bind(tour.transport_id.map(TransportId::into_inner))
        .bind(tour.id.into_inner())
        .execute(&mut *tx)
        .await?;

        Self::replace_links(&mut tx, tour.id, &tour.country_ids).await?;

        tx.commit().await?;

        Ok(tour.clone())
    }

    async fn delete(&self, id: TourId) -> AdventureResult<bool> {
        debug!("Deleting tour: {}", id);

        let mut tx = self.pool.inner().begin().await?;

        sqlx::query("DELETE FROM tour_countries WHERE tour_id = ?")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM tours WHERE id = ?")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}
