use crate::db::DbPool;
use crate::error::Result;
use crate::models::Reading;
use crate::repositories::ReadingStore;
use async_trait::async_trait;
use chrono::NaiveDateTime;

#[derive(Clone)]
pub struct ReadingRepository {
    pool: DbPool,
}

impl ReadingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadingStore for ReadingRepository {
    async fn readings_between(
        &self,
        home_id: &str,
        appliance_id: Option<&str>,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<Reading>> {
        let readings = sqlx::query_as::<_, Reading>(
            r#"
            SELECT ts, home_id, appliance_id, power_w, energy_kwh, voltage_v, current_a, status
            FROM appliance_readings
            WHERE home_id = $1
                AND ($2::TEXT IS NULL OR appliance_id = $2)
                AND ts >= $3 AND ts < $4
            ORDER BY ts, appliance_id
            "#,
        )
        .bind(home_id)
        .bind(appliance_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(readings)
    }

    async fn latest_readings(&self, home_id: &str) -> Result<Vec<Reading>> {
        let readings = sqlx::query_as::<_, Reading>(
            r#"
            SELECT ts, home_id, appliance_id, power_w, energy_kwh, voltage_v, current_a, status
            FROM appliance_readings
            WHERE home_id = $1
                AND ts = (SELECT MAX(ts) FROM appliance_readings WHERE home_id = $1)
            ORDER BY appliance_id
            "#,
        )
        .bind(home_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(readings)
    }
}
