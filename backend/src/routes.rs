use std::sync::Arc;
use std::time::Instant;

use actix_cors::Cors;
use actix_multipart::Multipart;
use actix_web::{get, post, web, HttpResponse, Responder};
use futures_util::TryStreamExt;
use log::{error, info, warn};

use crate::config::RelayConfig;
use crate::decoder::decode_image;
use crate::error::RelayError;
use crate::inference::ModelClient;
use crate::interpreter::interpret;
use crate::labels::ClassLabels;
use crate::models::{PingResponse, Prediction};

/// Immutable per-process state shared by every worker.
#[derive(Debug, Clone)]
pub struct RelayState {
    pub labels: ClassLabels,
    pub model: ModelClient,
    pub max_upload_bytes: usize,
}

impl RelayState {
    pub fn from_config(config: &RelayConfig) -> Self {
        Self {
            labels: config.class_labels.clone(),
            model: ModelClient::new(config.model_endpoint.clone()),
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

/// Any origin, method and header; credentials allowed.
pub fn cors() -> Cors {
    Cors::permissive()
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(ping).service(predict);
}

#[get("/ping")]
pub async fn ping() -> impl Responder {
    HttpResponse::Ok().json(PingResponse::alive())
}

#[post("/predict")]
pub async fn predict(
    state: web::Data<Arc<RelayState>>,
    payload: Multipart,
) -> Result<HttpResponse, RelayError> {
    let start_time = Instant::now();

    match run_prediction(&state, payload).await {
        Ok(prediction) => {
            info!(
                "Prediction: class={} confidence={:.3} ({} ms)",
                prediction.class,
                prediction.confidence,
                start_time.elapsed().as_millis()
            );
            Ok(HttpResponse::Ok().json(prediction))
        }
        Err(e) if e.is_upstream() => {
            error!("Model call failed via {}: {}", state.model.endpoint(), e);
            Err(e)
        }
        Err(e) if e.is_internal() => {
            error!("Prediction aborted: {}", e);
            Err(e)
        }
        Err(e) => {
            warn!("Rejected upload: {}", e);
            Err(e)
        }
    }
}

async fn run_prediction(state: &RelayState, payload: Multipart) -> Result<Prediction, RelayError> {
    let upload = read_upload(payload, state.max_upload_bytes).await?;
    info!(
        "Received {} ({} bytes)",
        upload.filename.as_deref().unwrap_or("unnamed field"),
        upload.data.len()
    );

    let data = upload.data;
    let image = web::block(move || decode_image(&data))
        .await
        .map_err(|_| RelayError::Blocking)??;

    let predictions = state.model.forward(&image).await?;
    interpret(&predictions, &state.labels)
}

struct Upload {
    filename: Option<String>,
    data: Vec<u8>,
}

/// Picks the first field carrying a filename, falling back to the first
/// field of the form when none does. The field name is not checked.
async fn read_upload(mut payload: Multipart, limit: usize) -> Result<Upload, RelayError> {
    let mut fallback = None;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| RelayError::Upload(e.to_string()))?
    {
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_owned);

        let mut data = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| RelayError::Upload(e.to_string()))?
        {
            if data.len() + chunk.len() > limit {
                return Err(RelayError::PayloadTooLarge { limit });
            }
            data.extend_from_slice(&chunk);
        }

        if filename.is_some() {
            return Ok(Upload { filename, data });
        }
        if fallback.is_none() {
            fallback = Some(Upload { filename, data });
        }
    }

    fallback.ok_or(RelayError::MissingUpload)
}
