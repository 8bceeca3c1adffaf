//! Optional sample data, created at startup when `SEED_SAMPLE_DATA` is set.

use charity_boxes::operations;
use sqlx::SqlitePool;
use tracing::info;

use crate::db::SqliteRepository;
use crate::errors::Result;

/// Register three boxes, put PLN 100 and EUR 50 into the first one and
/// empty the second.
pub async fn sample_data(pool: &SqlitePool) -> Result<()> {
    info!("Creating sample collection boxes...");
    let mut repo = SqliteRepository::begin(pool).await?;

    let first = operations::register_box(&mut repo).await?;
    let second = operations::register_box(&mut repo).await?;
    let third = operations::register_box(&mut repo).await?;

    operations::deposit(&mut repo, first.id(), Some("PLN"), 100.0).await?;
    operations::deposit(&mut repo, first.id(), Some("EUR"), 50.0).await?;
    operations::empty_box(&mut repo, second.id()).await?;

    repo.commit().await?;
    info!(
        "Created boxes with IDs: {}, {}, {}",
        first.id(),
        second.id(),
        third.id()
    );
    Ok(())
}
