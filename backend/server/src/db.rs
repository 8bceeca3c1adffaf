//! Database layer — pool setup, migrations, and the SQLite [`Repository`].

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use charity_boxes::{
    BoxId, CollectionBox, Currency, Error as DomainError, EventId, FundraisingEvent, Repository,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Sqlite, SqlitePool, Transaction,
};
use tracing::info;

use crate::errors::{storage, Result};

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };

    // Make sure the file is created if it doesn't exist yet.
    let options = SqliteConnectOptions::from_str(&url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied successfully");
    Ok(pool)
}

// ─────────────────────────────────────────────────────────
// Row shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
struct BoxRow {
    id: String,
    fundraising_event: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct MoneyRow {
    collection_box_id: String,
    currency: String,
    amount: f64,
}

#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    id: String,
    name: String,
    currency: String,
    account_balance: f64,
    collection_box_id: Option<String>,
}

fn corrupt(what: &str, value: &str) -> DomainError {
    DomainError::Storage(format!("corrupt {what} in database: {value:?}"))
}

fn parse_id<T: FromStr>(what: &str, value: &str) -> charity_boxes::Result<T> {
    value.parse().map_err(|_| corrupt(what, value))
}

fn decode_box(row: BoxRow, money: Vec<MoneyRow>) -> charity_boxes::Result<CollectionBox> {
    let id: BoxId = parse_id("box id", &row.id)?;
    let event = row
        .fundraising_event
        .as_deref()
        .map(|e| parse_id::<EventId>("event id", e))
        .transpose()?;
    let balances = money
        .into_iter()
        .map(|m| -> charity_boxes::Result<(Currency, f64)> {
            let currency = m
                .currency
                .parse()
                .map_err(|_| corrupt("currency", &m.currency))?;
            Ok((currency, m.amount))
        })
        .collect::<charity_boxes::Result<Vec<_>>>()?;
    Ok(CollectionBox::restore(id, balances, event))
}

fn decode_event(row: EventRow) -> charity_boxes::Result<FundraisingEvent> {
    let id: EventId = parse_id("event id", &row.id)?;
    let currency: Currency = row
        .currency
        .parse()
        .map_err(|_| corrupt("currency", &row.currency))?;
    let collection_box = row
        .collection_box_id
        .as_deref()
        .map(|b| parse_id::<BoxId>("box id", b))
        .transpose()?;
    Ok(FundraisingEvent::restore(
        id,
        row.name,
        currency,
        row.account_balance,
        collection_box,
    ))
}

// ─────────────────────────────────────────────────────────
// Repository
// ─────────────────────────────────────────────────────────

/// A [`Repository`] bound to one open transaction.
///
/// Dropping it without [`commit`](Self::commit) rolls every write back.
pub struct SqliteRepository {
    tx: Transaction<'static, Sqlite>,
}

impl SqliteRepository {
    pub async fn begin(pool: &SqlitePool) -> Result<Self> {
        Ok(Self {
            tx: pool.begin().await?,
        })
    }

    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn find_box(&mut self, id: BoxId) -> charity_boxes::Result<Option<CollectionBox>> {
        let row: Option<BoxRow> =
            sqlx::query_as("SELECT id, fundraising_event FROM collection_boxes WHERE id = ?1")
                .bind(id.to_string())
                .fetch_optional(&mut *self.tx)
                .await
                .map_err(storage)?;
        let Some(row) = row else {
            return Ok(None);
        };

        let money: Vec<MoneyRow> = sqlx::query_as(
            r#"
            SELECT collection_box_id, currency, amount
            FROM   collection_box_money
            WHERE  collection_box_id = ?1
            "#,
        )
        .bind(id.to_string())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(storage)?;

        decode_box(row, money).map(Some)
    }

    async fn save_box(&mut self, collection_box: &CollectionBox) -> charity_boxes::Result<()> {
        let id = collection_box.id().to_string();
        sqlx::query(
            r#"
            INSERT INTO collection_boxes (id, fundraising_event)
            VALUES (?1, ?2)
            ON CONFLICT(id) DO UPDATE SET fundraising_event = excluded.fundraising_event
            "#,
        )
        .bind(&id)
        .bind(collection_box.assigned_event().map(|e| e.to_string()))
        .execute(&mut *self.tx)
        .await
        .map_err(storage)?;

        for (currency, amount) in collection_box.balances() {
            sqlx::query(
                r#"
                INSERT INTO collection_box_money (collection_box_id, currency, amount)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(collection_box_id, currency) DO UPDATE SET amount = excluded.amount
                "#,
            )
            .bind(&id)
            .bind(currency.as_str())
            .bind(amount)
            .execute(&mut *self.tx)
            .await
            .map_err(storage)?;
        }
        Ok(())
    }

    async fn delete_box(&mut self, id: BoxId) -> charity_boxes::Result<()> {
        let id = id.to_string();
        sqlx::query("DELETE FROM collection_box_money WHERE collection_box_id = ?1")
            .bind(&id)
            .execute(&mut *self.tx)
            .await
            .map_err(storage)?;
        sqlx::query("DELETE FROM collection_boxes WHERE id = ?1")
            .bind(&id)
            .execute(&mut *self.tx)
            .await
            .map_err(storage)?;
        Ok(())
    }

    async fn box_exists(&mut self, id: BoxId) -> charity_boxes::Result<bool> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM collection_boxes WHERE id = ?1")
            .bind(id.to_string())
            .fetch_one(&mut *self.tx)
            .await
            .map_err(storage)?;
        Ok(count > 0)
    }

    async fn list_boxes(&mut self) -> charity_boxes::Result<Vec<CollectionBox>> {
        let rows: Vec<BoxRow> =
            sqlx::query_as("SELECT id, fundraising_event FROM collection_boxes ORDER BY id ASC")
                .fetch_all(&mut *self.tx)
                .await
                .map_err(storage)?;
        let money: Vec<MoneyRow> = sqlx::query_as(
            "SELECT collection_box_id, currency, amount FROM collection_box_money",
        )
        .fetch_all(&mut *self.tx)
        .await
        .map_err(storage)?;

        let mut by_box: HashMap<String, Vec<MoneyRow>> = HashMap::new();
        for m in money {
            by_box.entry(m.collection_box_id.clone()).or_default().push(m);
        }
        rows.into_iter()
            .map(|row| {
                let money = by_box.remove(&row.id).unwrap_or_default();
                decode_box(row, money)
            })
            .collect()
    }

    async fn find_event(&mut self, id: EventId) -> charity_boxes::Result<Option<FundraisingEvent>> {
        let row: Option<EventRow> = sqlx::query_as(
            r#"
            SELECT id, name, currency, account_balance, collection_box_id
            FROM   fundraising_events
            WHERE  id = ?1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(storage)?;
        row.map(decode_event).transpose()
    }

    async fn save_event(&mut self, event: &FundraisingEvent) -> charity_boxes::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO fundraising_events
                (id, name, currency, account_balance, collection_box_id)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                name              = excluded.name,
                currency          = excluded.currency,
                account_balance   = excluded.account_balance,
                collection_box_id = excluded.collection_box_id
            "#,
        )
        .bind(event.id().to_string())
        .bind(event.name())
        .bind(event.currency().as_str())
        .bind(event.account_balance())
        .bind(event.collection_box().map(|b| b.to_string()))
        .execute(&mut *self.tx)
        .await
        .map_err(storage)?;
        Ok(())
    }

    async fn delete_event(&mut self, id: EventId) -> charity_boxes::Result<()> {
        sqlx::query("DELETE FROM fundraising_events WHERE id = ?1")
            .bind(id.to_string())
            .execute(&mut *self.tx)
            .await
            .map_err(storage)?;
        Ok(())
    }

    async fn event_exists(&mut self, id: EventId) -> charity_boxes::Result<bool> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM fundraising_events WHERE id = ?1")
                .bind(id.to_string())
                .fetch_one(&mut *self.tx)
                .await
                .map_err(storage)?;
        Ok(count > 0)
    }

    async fn list_events(&mut self) -> charity_boxes::Result<Vec<FundraisingEvent>> {
        let rows: Vec<EventRow> = sqlx::query_as(
            r#"
            SELECT id, name, currency, account_balance, collection_box_id
            FROM   fundraising_events
            ORDER  BY id ASC
            "#,
        )
        .fetch_all(&mut *self.tx)
        .await
        .map_err(storage)?;
        rows.into_iter().map(decode_event).collect()
    }
}
