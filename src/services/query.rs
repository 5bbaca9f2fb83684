use crate::config::QueryConfig;
use crate::error::{AppError, Result};
use crate::models::{
    Appliance, Coverage, Home, HomeApplianceDaily, HomeDaily, HomeTouDaily, LiveApplianceLoad,
};
use crate::repositories::{ReadingStore, ReferenceStore};
use crate::services::attribution::TariffSchedule;
use crate::services::rollup::roll_up;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    HomeDaily,
    ApplianceDaily,
    AllAppliancesDaily,
    TouDaily,
    Live,
}

/// The views answered by a daily rollup over a date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RangedView {
    HomeDaily,
    ApplianceDaily,
    AllAppliancesDaily,
    TouDaily,
}

impl View {
    fn ranged(self) -> Option<RangedView> {
        match self {
            View::HomeDaily => Some(RangedView::HomeDaily),
            View::ApplianceDaily => Some(RangedView::ApplianceDaily),
            View::AllAppliancesDaily => Some(RangedView::AllAppliancesDaily),
            View::TouDaily => Some(RangedView::TouDaily),
            View::Live => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            View::HomeDaily => "home-daily",
            View::ApplianceDaily => "appliance-daily",
            View::AllAppliancesDaily => "all-appliances-daily",
            View::TouDaily => "tou-daily",
            View::Live => "live",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for View {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "home-daily" => Ok(View::HomeDaily),
            "appliance-daily" => Ok(View::ApplianceDaily),
            "all-appliances-daily" => Ok(View::AllAppliancesDaily),
            "tou-daily" | "peak-offpeak-daily" => Ok(View::TouDaily),
            "live" => Ok(View::Live),
            other => Err(AppError::NotFound(format!("Unknown view: {}", other))),
        }
    }
}

/// Filters for a view lookup. Dates are inclusive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewQuery {
    pub home_id: String,
    pub appliance_id: Option<String>,
    pub period_label: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ViewRows {
    Home(Vec<HomeDaily>),
    Appliance(Vec<HomeApplianceDaily>),
    Tou(Vec<HomeTouDaily>),
    Live(Vec<LiveApplianceLoad>),
}

impl ViewRows {
    pub fn len(&self) -> usize {
        match self {
            ViewRows::Home(rows) => rows.len(),
            ViewRows::Appliance(rows) => rows.len(),
            ViewRows::Tou(rows) => rows.len(),
            ViewRows::Live(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewResult {
    pub view: View,
    pub rows: ViewRows,
    /// Absent for live snapshots, which are not rollups.
    pub coverage: Option<Coverage>,
}

/// Answers view lookups by recomputing attribution and rollup per request.
#[derive(Clone)]
pub struct QueryService {
    reference: Arc<dyn ReferenceStore>,
    readings: Arc<dyn ReadingStore>,
    limits: QueryConfig,
}

impl QueryService {
    pub fn new(
        reference: Arc<dyn ReferenceStore>,
        readings: Arc<dyn ReadingStore>,
        limits: QueryConfig,
    ) -> Self {
        Self {
            reference,
            readings,
            limits,
        }
    }

    pub async fn query(&self, view: View, params: &ViewQuery) -> Result<ViewResult> {
        let budget = self.limits.timeout();
        tokio::time::timeout(budget, self.run(view, params))
            .await
            .map_err(|_| AppError::Timeout(budget))?
    }

    pub async fn list_homes(&self) -> Result<Vec<Home>> {
        self.reference.list_homes().await
    }

    pub async fn list_appliances(&self) -> Result<Vec<Appliance>> {
        self.reference.list_appliances().await
    }

    async fn run(&self, view: View, params: &ViewQuery) -> Result<ViewResult> {
        let Some(ranged) = view.ranged() else {
            let home = self.resolve_home(&params.home_id).await?;
            return self.live(&home).await;
        };

        let (start, end) = self.validate_range(params)?;
        let home = self.resolve_home(&params.home_id).await?;

        let appliance_id = match ranged {
            RangedView::ApplianceDaily => Some(params.appliance_id.as_deref().ok_or_else(|| {
                AppError::InvalidInput("appliance_id is required for appliance-daily".into())
            })?),
            RangedView::AllAppliancesDaily => params.appliance_id.as_deref(),
            RangedView::HomeDaily | RangedView::TouDaily => None,
        };
        if let Some(appliance_id) = appliance_id {
            if !self
                .reference
                .home_has_appliance(&home.home_id, appliance_id)
                .await?
            {
                return Err(AppError::NotFound(format!(
                    "Appliance {} not found for home {}",
                    appliance_id, home.home_id
                )));
            }
        }

        let intervals = self.reference.tariff_intervals(&home.region).await?;
        if let Some(bad) = intervals
            .iter()
            .find(|i| !i.rate_per_kwh.is_finite())
        {
            return Err(AppError::Config(format!(
                "Tariff {} in region {} has invalid rate {}",
                bad.period_label, bad.region, bad.rate_per_kwh
            )));
        }
        let schedule = TariffSchedule::new(intervals);
        let from = start.and_time(NaiveTime::MIN);
        let to = end
            .succ_opt()
            .ok_or_else(|| AppError::InvalidRange(format!("end date {} is out of range", end)))?
            .and_time(NaiveTime::MIN);
        let readings = self
            .readings
            .readings_between(&home.home_id, appliance_id, from, to)
            .await?;

        if schedule.is_empty() && !readings.is_empty() {
            warn!(home_id = %home.home_id, region = %home.region, "Region has no tariff windows");
        }

        let rollup = roll_up(&schedule, readings);
        report_coverage(&home.home_id, view, &rollup.coverage);

        let rows = match ranged {
            RangedView::HomeDaily => ViewRows::Home(rollup.home),
            RangedView::ApplianceDaily | RangedView::AllAppliancesDaily => {
                ViewRows::Appliance(rollup.appliance)
            }
            RangedView::TouDaily => {
                let mut rows = rollup.tou;
                if let Some(label) = params.period_label.as_deref() {
                    rows.retain(|r| r.period_label == label);
                }
                ViewRows::Tou(rows)
            }
        };

        debug!(
            home_id = %home.home_id,
            view = %view,
            %start,
            %end,
            rows = rows.len(),
            "View computed"
        );

        Ok(ViewResult {
            view,
            rows,
            coverage: Some(rollup.coverage),
        })
    }

    async fn live(&self, home: &Home) -> Result<ViewResult> {
        let mut latest = self.readings.latest_readings(&home.home_id).await?;
        latest.sort_by(|a, b| {
            a.appliance_id
                .cmp(&b.appliance_id)
                .then(a.power_w.total_cmp(&b.power_w))
        });

        let mut by_appliance: BTreeMap<&str, LiveApplianceLoad> = BTreeMap::new();
        for reading in &latest {
            by_appliance
                .entry(reading.appliance_id.as_str())
                .or_insert_with(|| LiveApplianceLoad {
                    timestamp: reading.timestamp,
                    appliance_id: reading.appliance_id.clone(),
                    power_w: 0.0,
                })
                .power_w += reading.power_w;
        }

        Ok(ViewResult {
            view: View::Live,
            rows: ViewRows::Live(by_appliance.into_values().collect()),
            coverage: None,
        })
    }

    async fn resolve_home(&self, home_id: &str) -> Result<Home> {
        self.reference
            .find_home(home_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Home {} not found", home_id)))
    }

    fn validate_range(&self, params: &ViewQuery) -> Result<(NaiveDate, NaiveDate)> {
        let (Some(start), Some(end)) = (params.start, params.end) else {
            return Err(AppError::InvalidRange(
                "Both start and end dates are required".into(),
            ));
        };

        if start > end {
            return Err(AppError::InvalidRange(format!(
                "Start date {} is after end date {}",
                start, end
            )));
        }

        let span_days = (end - start).num_days() + 1;
        if span_days > i64::from(self.limits.max_span_days) {
            return Err(AppError::InvalidRange(format!(
                "Range of {} days exceeds the maximum of {}",
                span_days, self.limits.max_span_days
            )));
        }

        Ok((start, end))
    }
}

fn report_coverage(home_id: &str, view: View, coverage: &Coverage) {
    if coverage.unattributed > 0 {
        warn!(
            home_id,
            view = %view,
            unattributed = coverage.unattributed,
            "Readings matched no tariff window and were excluded"
        );
    }
    if coverage.ambiguous > 0 {
        warn!(
            home_id,
            view = %view,
            ambiguous = coverage.ambiguous,
            "Readings matched overlapping tariff windows, earliest start used"
        );
    }
    if coverage.duplicates > 0 {
        warn!(
            home_id,
            view = %view,
            duplicates = coverage.duplicates,
            "Repeated readings ignored"
        );
    }
}
