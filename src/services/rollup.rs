use crate::models::{
    AttributedReading, Coverage, HomeApplianceDaily, HomeDaily, HomeTouDaily, Reading,
};
use crate::services::attribution::{attribute_reading, TariffSchedule};
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// The three daily grains produced from one batch of readings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailyRollup {
    pub home: Vec<HomeDaily>,
    pub appliance: Vec<HomeApplianceDaily>,
    pub tou: Vec<HomeTouDaily>,
    pub coverage: Coverage,
}

#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    energy_kwh: f64,
    cost_gbp: f64,
}

impl Totals {
    fn add(&mut self, r: &AttributedReading) {
        self.energy_kwh += r.energy_kwh;
        self.cost_gbp += r.cost_gbp;
    }
}

/// Grouped summation over attributed readings.
///
/// Keys live in BTreeMaps, so output is ordered by date and then by the
/// secondary key. Callers must feed readings in a fixed order for sums to be
/// reproducible; [`roll_up`] does this.
#[derive(Debug, Default)]
pub struct RollupBuilder {
    home: BTreeMap<(NaiveDate, String), Totals>,
    appliance: BTreeMap<(NaiveDate, String, String), Totals>,
    tou: BTreeMap<(NaiveDate, String, String), Totals>,
    coverage: Coverage,
}

impl RollupBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, r: &AttributedReading) {
        let date = r.date();
        self.home
            .entry((date, r.home_id.clone()))
            .or_default()
            .add(r);
        self.appliance
            .entry((date, r.home_id.clone(), r.appliance_id.clone()))
            .or_default()
            .add(r);
        self.tou
            .entry((date, r.home_id.clone(), r.period_label.clone()))
            .or_default()
            .add(r);
    }

    pub fn finish(self) -> DailyRollup {
        DailyRollup {
            home: self
                .home
                .into_iter()
                .map(|((date, home_id), t)| HomeDaily {
                    date,
                    home_id,
                    energy_kwh: t.energy_kwh,
                    cost_gbp: t.cost_gbp,
                })
                .collect(),
            appliance: self
                .appliance
                .into_iter()
                .map(|((date, home_id, appliance_id), t)| HomeApplianceDaily {
                    date,
                    home_id,
                    appliance_id,
                    energy_kwh: t.energy_kwh,
                    cost_gbp: t.cost_gbp,
                })
                .collect(),
            tou: self
                .tou
                .into_iter()
                .map(|((date, home_id, period_label), t)| HomeTouDaily {
                    date,
                    home_id,
                    period_label,
                    energy_kwh: t.energy_kwh,
                    cost_gbp: t.cost_gbp,
                })
                .collect(),
            coverage: self.coverage,
        }
    }
}

/// Attributes and aggregates a batch of readings against one schedule.
///
/// Readings are sorted by `(timestamp, home_id, appliance_id)` and then by
/// payload before folding, so the result does not depend on storage row
/// order. Of several readings sharing `(home_id, appliance_id, timestamp)`,
/// only the first in that order is folded; the rest count as duplicates.
pub fn roll_up(schedule: &TariffSchedule, mut readings: Vec<Reading>) -> DailyRollup {
    readings.sort_by(canonical_order);

    let mut builder = RollupBuilder::new();
    let mut previous: Option<&Reading> = None;

    for reading in &readings {
        builder.coverage.readings += 1;

        if previous.is_some_and(|p| p.dedup_key() == reading.dedup_key()) {
            builder.coverage.duplicates += 1;
            continue;
        }
        previous = Some(reading);

        match attribute_reading(schedule, reading) {
            Some((attributed, ambiguous)) => {
                builder.coverage.attributed += 1;
                if ambiguous {
                    builder.coverage.ambiguous += 1;
                }
                builder.add(&attributed);
            }
            None => builder.coverage.unattributed += 1,
        }
    }

    builder.finish()
}

fn canonical_order(a: &Reading, b: &Reading) -> Ordering {
    (a.timestamp, &a.home_id, &a.appliance_id)
        .cmp(&(b.timestamp, &b.home_id, &b.appliance_id))
        .then(a.energy_kwh.total_cmp(&b.energy_kwh))
        .then(a.power_w.total_cmp(&b.power_w))
        .then(a.voltage_v.total_cmp(&b.voltage_v))
        .then(a.current_a.total_cmp(&b.current_a))
        .then_with(|| a.status.cmp(&b.status))
}
