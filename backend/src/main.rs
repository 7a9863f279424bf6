use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use log::{error, info};

use blight_relay::routes::{self, RelayState};
use blight_relay::RelayConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .format_module_path(false)
        .init();

    info!("Starting blight-relay");

    let config = RelayConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    let labels: Vec<&str> = config.class_labels.iter().collect();
    info!("Model endpoint: {}", config.model_endpoint);
    info!("Class labels: {:?}", labels);
    match config.expected_outputs {
        Some(width) => info!("Label set validated against model output width {}", width),
        None => info!("Model output width not configured, checking each response"),
    }

    let state = web::Data::new(Arc::new(RelayState::from_config(&config)));
    let bind_address = config.bind_address();

    info!("Listening on http://{}", bind_address);
    info!("Workers: {}", config.workers);
    info!("Upload limit: {} bytes", config.max_upload_bytes);
    info!("Endpoints:");
    info!("   GET  /ping     - liveness probe");
    info!("   POST /predict  - classify an uploaded image");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(routes::cors())
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .workers(config.workers)
    .bind(&bind_address)
    .with_context(|| format!("cannot bind {}", bind_address))?
    .run()
    .await
    .context("server terminated with an error")?;

    Ok(())
}
