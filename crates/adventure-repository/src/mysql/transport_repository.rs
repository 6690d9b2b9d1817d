//! MySQL transport repository implementation.

use super::links;
use crate::{traits::TransportRepository, DatabasePoolInterface};
use adventure_core::{AdventureError, AdventureResult, NewTransport, Transport, TransportId};
use async_trait::async_trait;
use shaku::Component;
use sqlx::mysql::MySql;
use sqlx::{FromRow, QueryBuilder};
use std::sync::Arc;
use tracing::debug;

const SELECT_TRANSPORT: &str = "SELECT id, name, capacity, cost FROM transports";

/// MySQL transport repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = TransportRepository)]
pub struct MySqlTransportRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlTransportRepository {
    /// Creates a new MySQL transport repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a transport.
#[derive(Debug, FromRow)]
struct TransportRow {
    id: i64,
    name: String,
    capacity: i32,
    cost: f64,
}

impl From<TransportRow> for Transport {
    fn from(row: TransportRow) -> Self {
        Self {
            id: TransportId(row.id),
            name: row.name,
            capacity: row.capacity,
            cost: row.cost,
        }
    }
}

#[async_trait]
impl TransportRepository for MySqlTransportRepository {
    async fn find_all(&self) -> AdventureResult<Vec<Transport>> {
        debug!("Finding all transports");

        let rows = sqlx::query_as::<_, TransportRow>(&format!("{SELECT_TRANSPORT} ORDER BY id"))
            .fetch_all(self.pool.inner())
            .await?;

        Ok(rows.into_iter().map(Transport::from).collect())
    }

    async fn find_by_id(&self, id: TransportId) -> AdventureResult<Option<Transport>> {
        debug!("Finding transport by id: {}", id);

        let row = sqlx::query_as::<_, TransportRow>(&format!("{SELECT_TRANSPORT} WHERE id = ?"))
            .bind(id.into_inner())
            .fetch_optional(self.pool.inner())
            .await?;

        Ok(row.map(Transport::from))
    }

    async fn find_all_by_id(&self, ids: &[TransportId]) -> AdventureResult<Vec<Transport>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<i64> = ids.iter().map(|id| id.into_inner()).collect();
        let mut builder = QueryBuilder::<MySql>::new(SELECT_TRANSPORT);
        builder.push(" WHERE id");
        links::push_id_list(&mut builder, &raw);
        builder.push(" ORDER BY id");

        let rows = builder
            .build_query_as::<TransportRow>()
            .fetch_all(self.pool.inner())
            .await?;

        Ok(rows.into_iter().map(Transport::from).collect())
    }

    async fn count(&self) -> AdventureResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transports")
            .fetch_one(self.pool.inner())
            .await?;

        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn save(&self, transport: &NewTransport) -> AdventureResult<Transport> {
        debug!("Saving transport: {}", transport.name);

        let result = sqlx::query("INSERT INTO transports (name, capacity, cost) VALUES (?, ?, ?)")
            .bind(&transport.name)
            .bind(transport.capacity)
            .bind(transport.cost)
            .execute(self.pool.inner())
            .await?;

        let id = TransportId(i64::try_from(result.last_insert_id()).unwrap_or_default());
        Ok(transport.clone().into_transport(id))
    }

    async fn update(&self, transport: &Transport) -> AdventureResult<Transport> {
        debug!("Updating transport: {}", transport.id);

        let mut tx = self.pool.inner().begin().await?;

        let locked: Option<i64> =
            sqlx::query_scalar("SELECT id FROM transports WHERE id = ? FOR UPDATE")
                .bind(transport.id.into_inner())
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Err(AdventureError::not_found("Transport", transport.id));
        }

        sqlx::query("UPDATE transports SET name = ?, capacity = ?, cost = ? WHERE id = ?")
            .bind(&transport.name)
            .bind(transport.capacity)
            .bind(transport.cost)
            .bind(transport.id.into_inner())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(transport.clone())
    }

    async fn delete(&self, id: TransportId) -> AdventureResult<bool> {
        debug!("Deleting transport: {}", id);

        let mut tx = self.pool.inner().begin().await?;

        sqlx::query("UPDATE tours SET transport_id = NULL WHERE transport_id = ?")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM transports WHERE id = ?")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}
