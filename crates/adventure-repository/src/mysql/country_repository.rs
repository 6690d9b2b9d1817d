//! MySQL country repository implementation.

use super::links::{self, LinkScope};
use crate::{traits::CountryRepository, DatabasePoolInterface};
use adventure_core::{AdventureError, AdventureResult, Country, CountryId, NewCountry, TourId};
use async_trait::async_trait;
use shaku::Component;
use sqlx::mysql::{MySql, MySqlConnection};
use sqlx::{FromRow, QueryBuilder};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

const SELECT_COUNTRY: &str =
    "SELECT id, name, available, attractions, visa_cost, national_languages FROM countries";

/// MySQL country repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = CountryRepository)]
pub struct MySqlCountryRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlCountryRepository {
    /// Creates a new MySQL country repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }

    /// Inserts one country and its tour links inside the caller's transaction.
    async fn insert(conn: &mut MySqlConnection, country: &NewCountry) -> AdventureResult<Country> {
        let result = sqlx::query(
            r#"
            INSERT INTO countries (name, available, attractions, visa_cost, national_languages)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&country.name)
        .bind(country.available)
        .bind(&country.attractions)
        .bind(country.visa_cost)
        .bind(&country.national_languages)
        .execute(&mut *conn)
        .await?;

        let id = CountryId(i64::try_from(result.last_insert_id()).unwrap_or_default());
        let pairs: Vec<(TourId, CountryId)> =
            country.tour_ids.iter().map(|tour_id| (*tour_id, id)).collect();
        links::insert_links(conn, &pairs).await?;

        Ok(country.clone().into_country(id))
    }

    /// Attaches tour links to freshly loaded rows, keeping row order.
    async fn with_tours(&self, rows: Vec<CountryRow>) -> AdventureResult<Vec<Country>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let links = links::fetch_links(self.pool.inner(), LinkScope::Countries(&ids)).await?;
        let mut tours: HashMap<CountryId, BTreeSet<TourId>> = links::tours_by_country(&links);

        Ok(rows
            .into_iter()
            .map(|row| {
                let tour_ids = tours.remove(&CountryId(row.id)).unwrap_or_default();
                row.into_country(tour_ids)
            })
            .collect())
    }
}

/// Database row representation of a country.
#[derive(Debug, FromRow)]
struct CountryRow {
    id: i64,
    name: String,
    available: bool,
    attractions: String,
    visa_cost: f64,
    national_languages: String,
}

impl CountryRow {
    fn into_country(self, tour_ids: BTreeSet<TourId>) -> Country {
        Country {
            id: CountryId(self.id),
            name: self.name,
            available: self.available,
            attractions: self.attractions,
            visa_cost: self.visa_cost,
            national_languages: self.national_languages,
            tour_ids,
        }
    }
}

#[async_trait]
impl CountryRepository for MySqlCountryRepository {
    async fn find_all(&self) -> AdventureResult<Vec<Country>> {
        debug!("Finding all countries");

        let rows = sqlx::query_as::<_, CountryRow>(&format!("{SELECT_COUNTRY} ORDER BY id"))
            .fetch_all(self.pool.inner())
            .await?;

        self.with_tours(rows).await
    }

    async fn find_by_id(&self, id: CountryId) -> AdventureResult<Option<Country>> {
        debug!("Finding country by id: {}", id);

        let row = sqlx::query_as::<_, CountryRow>(&format!("{SELECT_COUNTRY} WHERE id = ?"))
            .bind(id.into_inner())
            .fetch_optional(self.pool.inner())
            .await?;

        match row {
            Some(row) => Ok(self.with_tours(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_all_by_id(&self, ids: &[CountryId]) -> AdventureResult<Vec<Country>> {
        debug!("Finding {} countries by id", ids.len());

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<i64> = ids.iter().map(|id| id.into_inner()).collect();
        let mut builder = QueryBuilder::<MySql>::new(SELECT_COUNTRY);
        builder.push(" WHERE id");
        links::push_id_list(&mut builder, &raw);
        builder.push(" ORDER BY id");

        let rows = builder
            .build_query_as::<CountryRow>()
            .fetch_all(self.pool.inner())
            .await?;

        self.with_tours(rows).await
    }

    async fn find_by_name_like(&self, prefix: &str) -> AdventureResult<Vec<Country>> {
        debug!("Finding countries with name prefix: {}", prefix);

        let rows = sqlx::query_as::<_, CountryRow>(&format!(
            "{SELECT_COUNTRY} WHERE name LIKE ? ORDER BY name, id"
        ))
        .bind(links::like_prefix(prefix))
        .fetch_all(self.pool.inner())
        .await?;

        self.with_tours(rows).await
    }

    async fn count(&self) -> AdventureResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM countries")
            .fetch_one(self.pool.inner())
            .await?;

        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn save(&self, country: &NewCountry) -> AdventureResult<Country> {
        debug!("Saving country: {}", country.name);

        let mut tx = self.pool.inner().begin().await?;
        let saved = Self::insert(&mut tx, country).await?;
        tx.commit().await?;

        Ok(saved)
    }

    async fn save_all(&self, countries: &[NewCountry]) -> AdventureResult<Vec<Country>> {
        debug!("Saving {} countries", countries.len());

        let mut tx = self.pool.inner().begin().await?;
        let mut saved = Vec::with_capacity(countries.len());
        for country in countries {
            saved.push(Self::insert(&mut tx, country).await?);
        }
        tx.commit().await?;

        Ok(saved)
    }

    async fn update(&self, country: &Country) -> AdventureResult<Country> {
        debug!("Updating country: {}", country.id);

        let mut tx = self.pool.inner().begin().await?;

        let locked: Option<i64> =
            sqlx::query_scalar("SELECT id FROM countries WHERE id = ? FOR UPDATE")
                .bind(country.id.into_inner())
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Err(AdventureError::not_found("Country", country.id));
        }

        sqlx::query(
            r#"
            UPDATE countries SET
                name = ?,
                available = ?,
                attractions = ?,
                visa_cost = ?,
                national_languages = ?
            WHERE id = ?
            "#,
        )
        .bind(&country.name)
        .bind(country.available)
        .bind(&country.attractions)
        .bind(country.visa_cost)
        .bind(&country.national_languages)
        .bind(country.id.into_inner())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(country.clone())
    }

    async fn delete(&self, id: CountryId) -> AdventureResult<bool> {
        debug!("Deleting country: {}", id);

        let mut tx = self.pool.inner().begin().await?;

        sqlx::query("DELETE FROM tour_countries WHERE country_id = ?")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM countries WHERE id = ?")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}
