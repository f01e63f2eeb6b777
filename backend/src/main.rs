use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use backend::config::AppConfig;
use backend::db::RecordStore;
use backend::output::OutputDir;
use backend::services::labels::generate::LabelService;
use env_logger::Env;
use log::{error, info};
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    let output = OutputDir::new(&config.output_dir);
    output.ensure()?;
    info!("Generated PDFs are stored in {}", output.path().display());

    let records = RecordStore::new(config.database.clone());
    records.initialize().map_err(|e| {
        error!(
            "Could not initialize database at {}: {}",
            config.database.path.display(),
            e
        );
        io::Error::other(e)
    })?;

    let static_dir = match config.static_dir.clone() {
        Some(dir) if dir.is_dir() => {
            info!("Static files served from: {}", dir.display());
            Some(dir)
        }
        Some(dir) => {
            error!("Static directory not found at {}", dir.display());
            None
        }
        None => None,
    };

    let service = web::Data::new(LabelService::new(output, records));
    let json_limit = config.json_limit;
    let address = config.bind_address();

    info!("Server running at http://{}", address);

    HttpServer::new(move || {
        App::new()
            .wrap(backend::cors())
            .wrap(Logger::default())
            .app_data(backend::json_config(json_limit))
            .app_data(service.clone())
            .configure(backend::configure)
            .configure(|cfg| backend::configure_static(cfg, static_dir.as_deref()))
    })
    .bind(address)?
    .run()
    .await
}
