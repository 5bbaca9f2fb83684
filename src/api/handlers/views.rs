use crate::api::extract::ApiQuery;
use crate::api::models::ViewResponse;
use crate::error::Result;
use crate::services::{QueryService, View, ViewQuery};
use axum::{
    extract::{Path, State},
    response::Json,
};

async fn respond(
    service: &QueryService,
    view: View,
    params: ViewQuery,
) -> Result<Json<ViewResponse>> {
    let result = service.query(view, &params).await?;
    Ok(Json(ViewResponse::new(params, result)))
}

/// GET /api/v1/timeseries/home-daily
pub async fn home_daily(
    State(service): State<QueryService>,
    ApiQuery(params): ApiQuery<ViewQuery>,
) -> Result<Json<ViewResponse>> {
    respond(&service, View::HomeDaily, params).await
}

/// GET /api/v1/timeseries/appliance-daily
pub async fn appliance_daily(
    State(service): State<QueryService>,
    ApiQuery(params): ApiQuery<ViewQuery>,
) -> Result<Json<ViewResponse>> {
    respond(&service, View::ApplianceDaily, params).await
}

/// GET /api/v1/timeseries/all-appliances-daily
pub async fn all_appliances_daily(
    State(service): State<QueryService>,
    ApiQuery(params): ApiQuery<ViewQuery>,
) -> Result<Json<ViewResponse>> {
    respond(&service, View::AllAppliancesDaily, params).await
}

/// GET /api/v1/cost/peak-offpeak-daily
pub async fn tou_daily(
    State(service): State<QueryService>,
    ApiQuery(params): ApiQuery<ViewQuery>,
) -> Result<Json<ViewResponse>> {
    respond(&service, View::TouDaily, params).await
}

/// GET /api/v1/live/home
pub async fn live_home(
    State(service): State<QueryService>,
    ApiQuery(params): ApiQuery<ViewQuery>,
) -> Result<Json<ViewResponse>> {
    respond(&service, View::Live, params).await
}

/// GET /api/v1/views/{view}
pub async fn by_name(
    State(service): State<QueryService>,
    Path(view): Path<String>,
    ApiQuery(params): ApiQuery<ViewQuery>,
) -> Result<Json<ViewResponse>> {
    let view: View = view.parse()?;
    respond(&service, view, params).await
}
