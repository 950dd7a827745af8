use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use log::{error, info, warn};

use route_rider::config::{Config, StoreKind};
use route_rider::db::{MemoryStore, MongoDB, Store};
use route_rider::handlers;

async fn connect_store(config: &Config) -> io::Result<Arc<dyn Store>> {
    match config.store {
        StoreKind::Memory => {
            warn!("Using the in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryStore::with_sample_routes()))
        }
        StoreKind::MongoDb => {
            let db = MongoDB::new(&config.mongodb_uri, &config.database_name)
                .await
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            if let Err(e) = db.ensure_indexes().await {
                error!("Failed to create indexes: {}", e);
                return Err(io::Error::new(io::ErrorKind::Other, e));
            }
            if let Err(e) = db.seed_data(config.force_seed).await {
                warn!("Seeding failed: {}", e);
            }
            info!("Connected to MongoDB database {}", config.database_name);
            Ok(Arc::new(db))
        }
    }
}

fn cors(config: &Config) -> Cors {
    match &config.cors_origin {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allow_any_method()
            .allow_any_header()
            .max_age(3600),
        None => Cors::permissive(),
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    let store = web::Data::from(connect_store(&config).await?);
    let bind = (config.host.clone(), config.port);
    let config = web::Data::new(config);

    info!("RouteRider listening on {}:{}", bind.0, bind.1);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(cors(&config))
            .app_data(store.clone())
            .app_data(config.clone())
            .configure(handlers::configure)
    })
    .bind(bind)?
    .run()
    .await
}
