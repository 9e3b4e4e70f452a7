// src/database.rs
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{error, info};

use crate::{errors::FleetTrackerError, models::ScrapedShipRecord};

/// Store for the latest scrape batch
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Wrap an existing pool, running pending migrations
    pub async fn new(pool: SqlitePool) -> Result<Self, FleetTrackerError> {
        if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
            error!("Failed to run database migrations: {}", e);
            return Err(e.into());
        }
        Ok(Self { pool })
    }

    /// Open (creating if needed) the database at `url`
    pub async fn from_url(url: &str) -> Result<Self, FleetTrackerError> {
        info!("Opening database at {}", url);
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Self::new(pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Replace the stored batch with `ships`.
    ///
    /// Delete and inserts commit together; on error nothing changes.
    pub async fn replace_ships(&self, ships: &[ScrapedShipRecord]) -> Result<u64, FleetTrackerError> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM ships")
            .execute(&mut *tx)
            .await?
            .rows_affected();

        for ship in ships {
            sqlx::query(
                "INSERT INTO ships (name, hull, class, status, location_reported)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(&ship.name)
            .bind(&ship.hull)
            .bind(&ship.ship_class)
            .bind(&ship.status)
            .bind(&ship.location_reported)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!(
            "Replaced {} stored ships with {} scraped ships",
            removed,
            ships.len()
        );
        Ok(ships.len() as u64)
    }

    /// All records of the current batch, in insertion order
    pub async fn fetch_ships(&self) -> Result<Vec<ScrapedShipRecord>, FleetTrackerError> {
        let ships = sqlx::query_as::<_, ScrapedShipRecord>(
            "SELECT name,
                    COALESCE(hull, '') AS hull,
                    COALESCE(class, '') AS class,
                    COALESCE(status, '') AS status,
                    COALESCE(location_reported, '') AS location_reported
             FROM ships
             ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(ships)
    }
}
