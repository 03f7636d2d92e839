use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::order_service::OrderService;
use crate::errors::AppError;

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuResponse {
    pub id: i64,
    pub name: String,
    pub price: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// GET /menus
///
/// Active menu entries ordered by name.
#[utoipa::path(
    get,
    path = "/menus",
    responses(
        (status = 200, description = "Active menu", body = [MenuResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "menus"
)]
pub async fn list_menus(service: web::Data<OrderService>) -> Result<HttpResponse, AppError> {
    let menus: Vec<MenuResponse> = service
        .list_menu()
        .await?
        .into_iter()
        .map(|m| MenuResponse {
            id: m.id,
            name: m.name,
            price: m.price,
            image_url: m.image_url,
        })
        .collect();
    Ok(HttpResponse::Ok().json(menus))
}
