use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Home {
    pub home_id: String,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Appliance {
    pub appliance_id: String,
    pub name: Option<String>,
}

/// A recurring daily price window for a region.
///
/// `start_time_of_day` is inclusive and `end_time_of_day` exclusive. A window
/// whose start lies after its end crosses midnight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffInterval {
    pub region: String,
    pub period_label: String,
    pub start_time_of_day: NaiveTime,
    pub end_time_of_day: NaiveTime,
    pub rate_per_kwh: f64,
}

impl TariffInterval {
    pub fn wraps_midnight(&self) -> bool {
        self.start_time_of_day > self.end_time_of_day
    }

    /// Half-open membership test for a time of day.
    pub fn contains(&self, t: NaiveTime) -> bool {
        let (s, e) = (self.start_time_of_day, self.end_time_of_day);
        if s <= e {
            s <= t && t < e
        } else {
            t >= s || t < e
        }
    }
}

impl<'r> FromRow<'r, PgRow> for TariffInterval {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            region: row.try_get("region")?,
            period_label: row.try_get("tariff_type")?,
            start_time_of_day: row.try_get("start_time")?,
            end_time_of_day: row.try_get("end_time")?,
            rate_per_kwh: row.try_get("rate_gbp_per_kwh")?,
        })
    }
}
