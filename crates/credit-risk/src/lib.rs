//! Client for a credit risk Prediction Service.
//!
//! The crate collects loan-applicant attributes through [`form::FormComponent`],
//! submits them via [`controller::RootController`], and renders the returned
//! classification with [`result::ResultView`]. [`session::ConsoleSession`] ties
//! the pieces together over a line-oriented terminal.

pub mod application;
pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod result;
pub mod service;
pub mod session;
pub mod telemetry;

pub use application::{ApplicationRecord, DefaultsRecord, Field, PredictionRequest};
pub use controller::{LoadingFlag, Notifier, PredictionFailure, RootController, ViewState};
pub use form::{DefaultsState, FormComponent, FormError};
pub use result::{ResultAction, ResultView, RiskLevel};
pub use service::{HttpPredictionService, PredictionResult, PredictionService, ServiceError};
pub use session::{ConsoleSession, SessionExit, StderrNotifier};
