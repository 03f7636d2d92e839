use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::notification_service::NotificationService;
use crate::domain::notification::PaymentNotification;
use crate::errors::AppError;

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationAck {
    pub received: bool,
}

/// POST /payments/notifications
///
/// Provider callback. The signature is the only authentication; a rejected
/// notification never touches storage. Repeated deliveries are acknowledged
/// the same way.
#[utoipa::path(
    post,
    path = "/payments/notifications",
    request_body(content = String, description = "Provider notification JSON", content_type = "application/json"),
    responses(
        (status = 200, description = "Notification applied", body = NotificationAck),
        (status = 400, description = "Malformed body or invalid signature"),
        (status = 404, description = "Unknown order"),
        (status = 500, description = "Processing error"),
    ),
    tag = "payments"
)]
pub async fn payment_notification(
    service: web::Data<NotificationService>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let notification: PaymentNotification = serde_json::from_slice(&body).map_err(|e| {
        log::warn!("payment_notification: malformed body: {}", e);
        AppError::BadRequest("Malformed notification".to_string())
    })?;

    service.handle(notification).await?;

    Ok(HttpResponse::Ok().json(NotificationAck { received: true }))
}
