use crate::db::DbPool;
use crate::error::Result;
use crate::models::{Appliance, Home, TariffInterval};
use crate::repositories::ReferenceStore;
use async_trait::async_trait;

#[derive(Clone)]
pub struct ReferenceRepository {
    pool: DbPool,
}

impl ReferenceRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReferenceStore for ReferenceRepository {
    async fn find_home(&self, home_id: &str) -> Result<Option<Home>> {
        let home = sqlx::query_as::<_, Home>(
            r#"
            SELECT home_id, region
            FROM homes
            WHERE home_id = $1
            "#,
        )
        .bind(home_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(home)
    }

    async fn list_homes(&self) -> Result<Vec<Home>> {
        let homes = sqlx::query_as::<_, Home>(
            r#"
            SELECT home_id, region
            FROM homes
            ORDER BY home_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(homes)
    }

    async fn list_appliances(&self) -> Result<Vec<Appliance>> {
        let appliances = sqlx::query_as::<_, Appliance>(
            r#"
            SELECT appliance_id, name
            FROM appliances
            ORDER BY appliance_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(appliances)
    }

    async fn home_has_appliance(&self, home_id: &str, appliance_id: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM home_appliances
                WHERE home_id = $1 AND appliance_id = $2
            )
            "#,
        )
        .bind(home_id)
        .bind(appliance_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn tariff_intervals(&self, region: &str) -> Result<Vec<TariffInterval>> {
        // Rows have no declared sequence column, so pin a total order here.
        let intervals = sqlx::query_as::<_, TariffInterval>(
            r#"
            SELECT
                region,
                tariff_type,
                start_time,
                end_time,
                CAST(rate_gbp_per_kwh AS DOUBLE PRECISION) AS rate_gbp_per_kwh
            FROM tariffs
            WHERE region = $1
            ORDER BY start_time, end_time, tariff_type, rate_gbp_per_kwh
            "#,
        )
        .bind(region)
        .fetch_all(&self.pool)
        .await?;

        Ok(intervals)
    }
}
