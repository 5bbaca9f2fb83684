use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A reading priced against the tariff window it fell into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributedReading {
    pub timestamp: NaiveDateTime,
    pub home_id: String,
    pub appliance_id: String,
    pub energy_kwh: f64,
    pub period_label: String,
    pub cost_gbp: f64,
}

impl AttributedReading {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeDaily {
    pub date: NaiveDate,
    pub home_id: String,
    pub energy_kwh: f64,
    pub cost_gbp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeApplianceDaily {
    pub date: NaiveDate,
    pub home_id: String,
    pub appliance_id: String,
    pub energy_kwh: f64,
    pub cost_gbp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeTouDaily {
    pub date: NaiveDate,
    pub home_id: String,
    pub period_label: String,
    pub energy_kwh: f64,
    pub cost_gbp: f64,
}

/// Data-quality counters for one rollup.
///
/// `unattributed` readings matched no tariff window and are absent from every
/// aggregate. `ambiguous` readings matched several windows and were priced by
/// the earliest-starting one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coverage {
    pub readings: u64,
    pub attributed: u64,
    pub unattributed: u64,
    pub ambiguous: u64,
    pub duplicates: u64,
}

impl Coverage {
    pub fn is_complete(&self) -> bool {
        self.unattributed == 0 && self.ambiguous == 0
    }
}
