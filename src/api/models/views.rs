use crate::models::Coverage;
use crate::services::{ViewQuery, ViewResult, ViewRows};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub view: &'static str,
    pub home_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    pub data: ViewRows,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage: Option<Coverage>,
}

impl ViewResponse {
    pub fn new(params: ViewQuery, result: ViewResult) -> Self {
        let ranged = result.coverage.is_some();
        Self {
            view: result.view.name(),
            home_id: params.home_id,
            start: params.start.filter(|_| ranged),
            end: params.end.filter(|_| ranged),
            data: result.rows,
            coverage: result.coverage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HomeDaily, LiveApplianceLoad};
    use crate::services::View;

    #[test]
    fn test_ranged_response_serialization() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let params = ViewQuery {
            home_id: "H1".into(),
            start: Some(day),
            end: Some(day),
            ..Default::default()
        };
        let result = ViewResult {
            view: View::HomeDaily,
            rows: ViewRows::Home(vec![HomeDaily {
                date: day,
                home_id: "H1".into(),
                energy_kwh: 2.0,
                cost_gbp: 0.6,
            }]),
            coverage: Some(Coverage {
                readings: 1,
                attributed: 1,
                ..Default::default()
            }),
        };

        let json = serde_json::to_value(ViewResponse::new(params, result)).unwrap();
        assert_eq!(json["view"], "home-daily");
        assert_eq!(json["start"], "2025-01-01");
        assert_eq!(json["data"][0]["date"], "2025-01-01");
        assert_eq!(json["data"][0]["cost_gbp"], 0.6);
        assert_eq!(json["coverage"]["unattributed"], 0);
    }

    #[test]
    fn test_live_response_omits_range_and_coverage() {
        let params = ViewQuery {
            home_id: "H1".into(),
            ..Default::default()
        };
        let result = ViewResult {
            view: View::Live,
            rows: ViewRows::Live(vec![LiveApplianceLoad {
                timestamp: NaiveDate::from_ymd_opt(2025, 1, 1)
                    .unwrap()
                    .and_hms_opt(12, 0, 0)
                    .unwrap(),
                appliance_id: "tv".into(),
                power_w: 80.0,
            }]),
            coverage: None,
        };

        let json = serde_json::to_value(ViewResponse::new(params, result)).unwrap();
        assert!(json.get("coverage").is_none());
        assert!(json.get("start").is_none());
        assert_eq!(json["data"][0]["appliance_id"], "tv");
        assert_eq!(json["data"][0]["timestamp"], "2025-01-01T12:00:00");
    }
}
