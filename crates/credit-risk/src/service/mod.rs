//! Client side of the external Prediction Service.
//!
//! The service exposes two JSON endpoints: `GET /api/defaults` for the
//! reference applicant used to pre-fill the form, and `POST /api/predict`
//! which scores an application. Everything behind that HTTP boundary is
//! opaque to this crate.

mod http;

pub use http::HttpPredictionService;

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::application::{DefaultsRecord, PredictionRequest};

pub const DEFAULTS_PATH: &str = "/api/defaults";
pub const PREDICT_PATH: &str = "/api/predict";

/// Seam between the controller/form and whatever answers the two endpoints.
pub trait PredictionService {
    fn fetch_defaults(&self) -> impl Future<Output = Result<DefaultsRecord, ServiceError>>;

    fn predict(
        &self,
        request: &PredictionRequest,
    ) -> impl Future<Output = Result<PredictionResult, ServiceError>>;
}

/// One feature's signed contribution to the predicted probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorContribution {
    pub feature: String,
    pub shap_value: f64,
}

/// Scored response of `POST /api/predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub risk_label: String,
    pub risk_color: String,
    pub probability: f64,
    #[serde(default)]
    pub shap_values: Vec<FactorContribution>,
    /// Predicted class, 1 for risk and 0 for non-risk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<u8>,
    /// Expected probability over the explainer background.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction_probability: Option<f64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("could not reach prediction service: {0}")]
    Http(#[from] reqwest::Error),
    #[error("prediction service returned {status}: {body}")]
    Server { status: u16, body: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_minimal_prediction_payload() {
        let payload = json!({
            "risk_label": "Low Risk",
            "risk_color": "#2e7d32",
            "probability": 0.0421,
            "shap_values": [{"feature": "loan_int_rate", "shap_value": -0.12}],
        });

        let result: PredictionResult = serde_json::from_value(payload).expect("decodes");
        assert_eq!(result.risk_label, "Low Risk");
        assert_eq!(result.shap_values.len(), 1);
        assert_eq!(result.shap_values[0].feature, "loan_int_rate");
        assert!(result.prediction.is_none());
        assert!(result.base_value.is_none());
    }

    #[test]
    fn decodes_full_backend_payload() {
        let payload = json!({
            "probability": 0.61,
            "prediction": 1,
            "risk_label": "High Risk",
            "risk_color": "#c62828",
            "shap_values": [
                {"feature": "loan_grade_D", "shap_value": 0.21, "abs_shap": 0.21},
                {"feature": "person_income", "shap_value": -0.04, "abs_shap": 0.04}
            ],
            "base_value": 0.18,
            "prediction_probability": 0.61,
        });

        let result: PredictionResult = serde_json::from_value(payload).expect("decodes");
        assert_eq!(result.prediction, Some(1));
        assert_eq!(result.base_value, Some(0.18));
        assert_eq!(result.shap_values[1].shap_value, -0.04);
    }
}
