use log::{debug, warn};

use crate::decoder::ImageTensor;
use crate::error::RelayError;
use crate::models::{ModelRequest, ModelResponse};

/// Client for the remote model server.
///
/// No retries and no explicit timeout: a request waits as long as the
/// underlying HTTP client does.
#[derive(Debug, Clone)]
pub struct ModelClient {
    client: reqwest::Client,
    endpoint: String,
}

impl ModelClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one image as a batch of size 1 and returns the raw prediction
    /// vectors.
    pub async fn forward(&self, image: &ImageTensor) -> Result<Vec<Vec<f64>>, RelayError> {
        debug!("Forwarding {:?} image to {}", image.shape(), self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&ModelRequest::batch_of_one(image))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Model server returned HTTP {}: {}", status, body);
            return Err(RelayError::UpstreamStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        let parsed: ModelResponse = serde_json::from_slice(&body)
            .map_err(|e| RelayError::MalformedResponse(e.to_string()))?;

        Ok(parsed.predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_keeps_endpoint() {
        let client = ModelClient::new("http://localhost:8501/v1/models/potato_model:predict");
        assert_eq!(
            client.endpoint(),
            "http://localhost:8501/v1/models/potato_model:predict"
        );
    }
}
