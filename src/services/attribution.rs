use crate::models::{AttributedReading, Reading, TariffInterval};
use chrono::NaiveTime;

/// Outcome of matching one time of day against a region's schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Attribution<'a> {
    Matched {
        interval: &'a TariffInterval,
        /// Further windows that also contained the time. Non-zero means the
        /// schedule overlaps there.
        overlapping: usize,
    },
    Unmatched,
}

/// A region's tariff windows in tie-break order: ascending start time of day,
/// then the order they were declared in.
#[derive(Debug, Clone, Default)]
pub struct TariffSchedule {
    intervals: Vec<TariffInterval>,
}

impl TariffSchedule {
    pub fn new(mut intervals: Vec<TariffInterval>) -> Self {
        // stable: equal starts keep declaration order
        intervals.sort_by_key(|i| i.start_time_of_day);
        Self { intervals }
    }

    pub fn intervals(&self) -> &[TariffInterval] {
        &self.intervals
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn attribute(&self, t: NaiveTime) -> Attribution<'_> {
        let mut matches = self.intervals.iter().filter(|i| i.contains(t));
        match matches.next() {
            Some(interval) => Attribution::Matched {
                interval,
                overlapping: matches.count(),
            },
            None => Attribution::Unmatched,
        }
    }
}

/// Prices a reading, or `None` when no window covers its time of day.
///
/// The second element reports whether the match was ambiguous.
pub fn attribute_reading(
    schedule: &TariffSchedule,
    reading: &Reading,
) -> Option<(AttributedReading, bool)> {
    match schedule.attribute(reading.timestamp.time()) {
        Attribution::Matched {
            interval,
            overlapping,
        } => Some((
            AttributedReading {
                timestamp: reading.timestamp,
                home_id: reading.home_id.clone(),
                appliance_id: reading.appliance_id.clone(),
                energy_kwh: reading.energy_kwh,
                period_label: interval.period_label.clone(),
                cost_gbp: reading.energy_kwh * interval.rate_per_kwh,
            },
            overlapping > 0,
        )),
        Attribution::Unmatched => None,
    }
}
