use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};

/// One appliance sample for one home. Timestamps are naive local time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub home_id: String,
    pub appliance_id: String,
    pub timestamp: NaiveDateTime,
    pub power_w: f64,
    pub energy_kwh: f64,
    pub voltage_v: f64,
    pub current_a: f64,
    pub status: String,
}

impl Reading {
    /// Identity used to ignore replays of the same sample.
    pub fn dedup_key(&self) -> (&str, &str, NaiveDateTime) {
        (&self.home_id, &self.appliance_id, self.timestamp)
    }
}

impl<'r> FromRow<'r, PgRow> for Reading {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            home_id: row.try_get("home_id")?,
            appliance_id: row.try_get("appliance_id")?,
            timestamp: row.try_get("ts")?,
            power_w: row.try_get("power_w")?,
            energy_kwh: row.try_get("energy_kwh")?,
            voltage_v: row.try_get("voltage_v")?,
            current_a: row.try_get("current_a")?,
            status: row.try_get("status")?,
        })
    }
}

/// Summed instantaneous power of one appliance at the home's latest timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveApplianceLoad {
    pub timestamp: NaiveDateTime,
    pub appliance_id: String,
    pub power_w: f64,
}
