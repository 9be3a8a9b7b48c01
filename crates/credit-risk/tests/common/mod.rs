//! Stub Prediction Service served over a real socket for end-to-end client tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

#[derive(Debug, Clone)]
pub struct StubBehavior {
    pub defaults_status: StatusCode,
    /// Number of leading defaults requests answered with 503 before `defaults_status` applies.
    pub defaults_failures: usize,
    pub predict_status: StatusCode,
    pub defaults: Value,
    pub prediction: Value,
}

impl Default for StubBehavior {
    fn default() -> Self {
        Self {
            defaults_status: StatusCode::OK,
            defaults_failures: 0,
            predict_status: StatusCode::OK,
            defaults: reference_defaults(),
            prediction: low_risk_prediction(),
        }
    }
}

#[derive(Debug, Default)]
pub struct StubState {
    pub behavior: Mutex<StubBehavior>,
    pub predict_bodies: Mutex<Vec<Value>>,
    pub defaults_hits: Mutex<usize>,
}

impl StubState {
    pub fn bodies(&self) -> Vec<Value> {
        self.predict_bodies.lock().expect("stub mutex poisoned").clone()
    }

    pub fn defaults_hits(&self) -> usize {
        *self.defaults_hits.lock().expect("stub mutex poisoned")
    }
}

pub fn reference_defaults() -> Value {
    json!({
        "person_age": 25,
        "person_income": 50000,
        "person_emp_length": 8,
        "loan_amnt": 10000,
        "loan_int_rate": 11.0,
        "loan_percent_income": 0.15,
        "cb_person_cred_hist_length": 10,
        "person_home_ownership": "OWN",
        "loan_intent": "DEBTCONSOLIDATION",
        "loan_grade": "A",
        "cb_person_default_on_file": "N",
    })
}

pub fn low_risk_prediction() -> Value {
    json!({
        "probability": 0.0421,
        "prediction": 0,
        "risk_label": "Low Risk",
        "risk_color": "#2e7d32",
        "base_value": 0.1834,
        "prediction_probability": 0.0421,
        "shap_values": [
            {"feature": "loan_int_rate", "shap_value": -0.12, "abs_shap": 0.12},
            {"feature": "person_income", "shap_value": -0.08, "abs_shap": 0.08},
            {"feature": "loan_percent_income", "shap_value": 0.05, "abs_shap": 0.05},
            {"feature": "loan_grade_B", "shap_value": -0.02, "abs_shap": 0.02},
            {"feature": "person_age", "shap_value": 0.01, "abs_shap": 0.01},
            {"feature": "loan_amnt", "shap_value": 0.004, "abs_shap": 0.004},
            {"feature": "person_emp_length", "shap_value": -0.002, "abs_shap": 0.002}
        ]
    })
}

async fn defaults_handler(State(state): State<Arc<StubState>>) -> (StatusCode, Json<Value>) {
    *state.defaults_hits.lock().expect("stub mutex poisoned") += 1;
    let behavior = {
        let mut guard = state.behavior.lock().expect("stub mutex poisoned");
        if guard.defaults_failures > 0 {
            guard.defaults_failures -= 1;
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": "Model not loaded" })),
            );
        }
        guard.clone()
    };
    if behavior.defaults_status.is_success() {
        (behavior.defaults_status, Json(behavior.defaults))
    } else {
        (
            behavior.defaults_status,
            Json(json!({ "error": "Model not loaded" })),
        )
    }
}

async fn predict_handler(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state
        .predict_bodies
        .lock()
        .expect("stub mutex poisoned")
        .push(body);
    let behavior = state.behavior.lock().expect("stub mutex poisoned").clone();
    if behavior.predict_status.is_success() {
        (behavior.predict_status, Json(behavior.prediction))
    } else {
        (
            behavior.predict_status,
            Json(json!({ "error": "prediction exploded" })),
        )
    }
}

/// Serve the stub on an ephemeral port and return its base URL.
pub async fn spawn_stub(behavior: StubBehavior) -> (String, Arc<StubState>) {
    let state = Arc::new(StubState {
        behavior: Mutex::new(behavior),
        ..StubState::default()
    });
    let app = Router::new()
        .route("/api/defaults", get(defaults_handler))
        .route("/api/predict", post(predict_handler))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server runs");
    });

    (format!("http://{addr}"), state)
}

/// A base URL nothing is listening on.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind throwaway listener");
    let addr = listener.local_addr().expect("throwaway address");
    drop(listener);
    format!("http://{addr}")
}
