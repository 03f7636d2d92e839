pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::notification_service::NotificationService;
use application::order_service::OrderService;
use domain::errors::GatewayError;
use domain::ports::OrderRepository;
use errors::AppError;
use infrastructure::menu_repo::DieselMenuRepository;
use infrastructure::midtrans::{MidtransConfig, MidtransGateway};
use infrastructure::order_repo::DieselOrderRepository;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::orders::create_order,
        handlers::orders::get_order,
        handlers::orders::set_order_status,
        handlers::orders::kitchen_orders,
        handlers::orders::dashboard,
        handlers::menus::list_menus,
        handlers::payments::payment_notification,
    ),
    tags(
        (name = "orders", description = "Checkout and order lookup"),
        (name = "payments", description = "Payment provider callbacks"),
        (name = "kitchen", description = "Kitchen display"),
        (name = "dashboard", description = "Owner reporting"),
        (name = "menus", description = "Menu catalog"),
    )
)]
pub struct ApiDoc;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// Wires the store and provider clients into the two services. Both use the
/// elevated database credential behind `pool`.
pub fn build_services(
    pool: DbPool,
    midtrans: MidtransConfig,
) -> Result<(OrderService, NotificationService), GatewayError> {
    let orders: Arc<dyn OrderRepository> = Arc::new(DieselOrderRepository::new(pool.clone()));
    let menus = Arc::new(DieselMenuRepository::new(pool));
    let charge_timeout = midtrans.timeout;
    let server_key = midtrans.server_key.clone();
    let gateway = Arc::new(MidtransGateway::new(midtrans)?);

    Ok((
        OrderService::new(Arc::clone(&orders), menus, gateway, charge_timeout),
        NotificationService::new(orders, server_key),
    ))
}

/// Routes shared by the real server and in-process tests. Expects
/// `web::Data<OrderService>` and `web::Data<NotificationService>` as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    use handlers::{menus, method_not_allowed, orders, payments};

    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::resource("/orders")
            .route(web::post().to(orders::create_order))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/orders/{id}")
            .route(web::get().to(orders::get_order))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/orders/{id}/status")
            .route(web::patch().to(orders::set_order_status))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/kitchen/orders")
            .route(web::get().to(orders::kitchen_orders))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/dashboard")
            .route(web::get().to(orders::dashboard))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/menus")
            .route(web::get().to(menus::list_menus))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/payments/notifications")
            .route(web::post().to(payments::payment_notification))
            .default_service(web::to(method_not_allowed)),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    orders: OrderService,
    notifications: NotificationService,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let orders = web::Data::new(orders);
    let notifications = web::Data::new(notifications);
    let openapi = ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(orders.clone())
            .app_data(notifications.clone())
            .wrap(Logger::default())
            .configure(configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
