pub mod menus;
pub mod orders;
pub mod payments;

use actix_web::HttpResponse;

use crate::errors::AppError;

/// Default service for resources: any method without a route.
pub async fn method_not_allowed() -> Result<HttpResponse, AppError> {
    Err(AppError::MethodNotAllowed)
}
