use tracing::{debug, info};

use super::{PredictionResult, PredictionService, ServiceError, DEFAULTS_PATH, PREDICT_PATH};
use crate::application::{DefaultsRecord, PredictionRequest};

/// reqwest-backed client for a Prediction Service rooted at `base_url`.
#[derive(Debug, Clone)]
pub struct HttpPredictionService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPredictionService {
    /// `base_url` looks like `http://127.0.0.1:5000`; a trailing slash is ignored.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, ServiceError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(ServiceError::Server {
            status: status.as_u16(),
            body,
        })
    }
}

impl PredictionService for HttpPredictionService {
    async fn fetch_defaults(&self) -> Result<DefaultsRecord, ServiceError> {
        let url = self.url(DEFAULTS_PATH);
        debug!(url = %url, "fetching form defaults");

        let resp = self.client.get(&url).send().await?;
        let resp = Self::ensure_success(resp).await?;
        let defaults: DefaultsRecord = resp.json().await?;

        info!(fields = defaults.as_map().len(), "loaded form defaults");
        Ok(defaults)
    }

    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, ServiceError> {
        let url = self.url(PREDICT_PATH);
        debug!(url = %url, "requesting risk prediction");

        let resp = self.client.post(&url).json(request).send().await?;
        let resp = Self::ensure_success(resp).await?;
        let result: PredictionResult = resp.json().await?;

        info!(
            risk_label = %result.risk_label,
            probability = result.probability,
            factors = result.shap_values.len(),
            "prediction received"
        );
        Ok(result)
    }
}
