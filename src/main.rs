use std::io;

use dotenvy::dotenv;
use table_order::config::AppConfig;
use table_order::{build_server, build_services, create_pool, run_migrations};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(io::Error::other)?;
    log::info!("Loaded configuration: {:?}", config);

    let pool = create_pool(&config.database_url).map_err(io::Error::other)?;
    run_migrations(&pool).map_err(io::Error::other)?;

    let (orders, notifications) =
        build_services(pool, config.midtrans.clone()).map_err(io::Error::other)?;

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(orders, notifications, &config.host, config.port)?.await
}
