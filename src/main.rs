use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use std::io;
use std::sync::Arc;

use stockroom::auth::AccessGate;
use stockroom::config::Config;
use stockroom::repository::{PgRepository, Storage};
use stockroom::routes;

fn startup_error(err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(startup_error)?;
    let table = Arc::new(config.route_table().map_err(startup_error)?);
    let settings = Arc::new(config.auth.clone());

    let storage = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(url)
                .await
                .map_err(startup_error)?;
            let repo = PgRepository::new(pool);
            repo.migrate().await.map_err(startup_error)?;
            Storage::postgres(repo)
        }
        None => {
            log::warn!("DATABASE_URL is not set; records are kept in memory and lost on exit");
            Storage::memory()
        }
    };

    log::info!("Starting stockroom server at {}", config.server_url());

    HttpServer::new(move || {
        let storage = storage.clone();
        App::new()
            .configure(move |cfg| storage.register(cfg))
            .app_data(web::Data::from(settings.clone()))
            .wrap(AccessGate::new(table.clone(), settings.clone()))
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
