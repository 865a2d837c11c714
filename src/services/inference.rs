use crate::config::AppConfig;
use crate::models::Detection;
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

/// What the detector returns for one image. An empty `boxes` list is
/// the gateway's "nothing usable" value; callers decide what to do
/// with it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Prediction {
    pub boxes: Vec<Detection>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub annotated_image_base64: Option<String>,
}

impl Prediction {
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

/// Delegates image bytes to the external detection model.
#[async_trait]
pub trait InferenceGateway: Send + Sync {
    /// Run detection over `image`. Must never fail the caller: any
    /// upstream problem collapses to an empty prediction.
    async fn predict(&self, image: &[u8], filename: &str) -> Prediction;
}

/// Production gateway: one multipart POST per request, bounded by a 5s
/// connect timeout and a 30s overall timeout, no retries.
pub struct HttpInferenceGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpInferenceGateway {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.inference_connect_timeout_secs))
            .timeout(Duration::from_secs(config.inference_request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.inference_url.clone(),
        })
    }

    async fn request(&self, image: Vec<u8>, filename: String) -> Result<Prediction> {
        let part = reqwest::multipart::Part::bytes(image)
            .file_name(filename)
            .mime_str("image/jpeg")?;
        let form = reqwest::multipart::Form::new().part("image", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("inference endpoint returned HTTP {status}");
        }

        // A response without the expected `boxes` array fails to parse
        // and falls into the empty-prediction path.
        let prediction = response.json::<Prediction>().await?;
        Ok(prediction)
    }
}

#[async_trait]
impl InferenceGateway for HttpInferenceGateway {
    async fn predict(&self, image: &[u8], filename: &str) -> Prediction {
        match self.request(image.to_vec(), filename.to_string()).await {
            Ok(prediction) => prediction,
            Err(e) => {
                warn!("🔌 Inference call to {} failed: {e}", self.endpoint);
                Prediction::default()
            }
        }
    }
}
