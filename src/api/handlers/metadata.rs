use crate::error::Result;
use crate::models::{Appliance, Home};
use crate::services::QueryService;
use axum::{extract::State, response::Json};

/// GET /api/v1/homes
pub async fn list_homes(State(service): State<QueryService>) -> Result<Json<Vec<Home>>> {
    Ok(Json(service.list_homes().await?))
}

/// GET /api/v1/appliances
pub async fn list_appliances(
    State(service): State<QueryService>,
) -> Result<Json<Vec<Appliance>>> {
    Ok(Json(service.list_appliances().await?))
}
