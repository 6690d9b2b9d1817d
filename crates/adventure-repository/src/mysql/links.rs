//! Country↔Tour link table access shared by the MySQL repositories.
//!
//! `tour_countries` is the single source of truth for the many-to-many edge;
//! both sides of the relationship are materialized from it on read.

use adventure_core::{AdventureResult, CountryId, TourId};
use sqlx::mysql::{MySql, MySqlConnection, MySqlPool};
use sqlx::{FromRow, QueryBuilder};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, FromRow)]
struct LinkRow {
    tour_id: i64,
    country_id: i64,
}

/// Which link rows to load.
pub(crate) enum LinkScope<'a> {
    All,
    Tours(&'a [i64]),
    Countries(&'a [i64]),
}

pub(crate) async fn fetch_links(
    pool: &MySqlPool,
    scope: LinkScope<'_>,
) -> AdventureResult<Vec<(TourId, CountryId)>> {
    let mut builder = QueryBuilder::<MySql>::new("SELECT tour_id, country_id FROM tour_countries");

    let (column, ids) = match scope {
        LinkScope::All => (None, &[][..]),
        LinkScope::Tours(ids) => (Some("tour_id"), ids),
        LinkScope::Countries(ids) => (Some("country_id"), ids),
    };

    if let Some(column) = column {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        builder.push(" WHERE ").push(column);
        push_id_list(&mut builder, ids);
    }

    let rows = builder
        .build_query_as::<LinkRow>()
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| (TourId(row.tour_id), CountryId(row.country_id)))
        .collect())
}

pub(crate) fn tours_by_country(
    links: &[(TourId, CountryId)],
) -> HashMap<CountryId, BTreeSet<TourId>> {
    let mut grouped: HashMap<CountryId, BTreeSet<TourId>> = HashMap::new();
    for (tour_id, country_id) in links {
        grouped.entry(*country_id).or_default().insert(*tour_id);
    }
    grouped
}

pub(crate) fn countries_by_tour(
    links: &[(TourId, CountryId)],
) -> HashMap<TourId, BTreeSet<CountryId>> {
    let mut grouped: HashMap<TourId, BTreeSet<CountryId>> = HashMap::new();
    for (tour_id, country_id) in links {
        grouped.entry(*tour_id).or_default().insert(*country_id);
    }
    grouped
}

/// Inserts link rows inside the caller's transaction.
pub(crate) async fn insert_links(
    conn: &mut MySqlConnection,
    pairs: &[(TourId, CountryId)],
) -> AdventureResult<()> {
    if pairs.is_empty() {
        return Ok(());
    }

    let mut builder =
        QueryBuilder::<MySql>::new("INSERT INTO tour_countries (tour_id, country_id) ");
    builder.push_values(pairs, |mut row, (tour_id, country_id)| {
        row.push_bind(tour_id.into_inner())
            .push_bind(country_id.into_inner());
    });
    builder.build().execute(&mut *conn).await?;
    Ok(())
}

/// Pushes ` IN (?, ?, ...)` for a non-empty id list.
pub(crate) fn push_id_list(builder: &mut QueryBuilder<'_, MySql>, ids: &[i64]) {
    builder.push(" IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
}

/// Escapes LIKE wildcards and appends `%` for a prefix match.
pub(crate) fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
