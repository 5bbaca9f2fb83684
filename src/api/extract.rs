use crate::error::AppError;
use axum::extract::{FromRequestParts, Query};

/// `Query` whose parse failures render as `AppError::InvalidInput`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
