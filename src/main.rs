use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use diesel::r2d2::ConnectionManager;
use diesel::PgConnection;
use dotenvy::dotenv;
use env_logger::Env;
use r2d2::Pool;

mod addresses;
mod cinemas;
mod db;
mod error;
mod model;
mod movies;
mod query;
mod schema;
mod sessions;
mod settings;
mod validation;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let settings = settings::Settings::from_env().expect("Failed to load settings.");

    let manager = ConnectionManager::<PgConnection>::new(settings.database_url.clone());
    let pool = Pool::builder()
        .build(manager)
        .expect("Failed to create pool.");

    log::info!("Starting cineinfo-api on {}:{}", settings.host, settings.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .configure(movies::config)
            .configure(cinemas::config)
            .configure(addresses::config)
            .configure(sessions::config)
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await
}
