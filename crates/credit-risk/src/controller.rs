//! Root view controller: owns the current view and the loading flag, and runs predictions.

use std::cell::Cell;
use std::rc::Rc;

use tracing::{info, warn};

use crate::application::{ApplicationRecord, CoercionError};
use crate::service::{PredictionResult, PredictionService, ServiceError};

/// Which screen is showing. The result travels with the variant so it cannot go stale.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Form,
    Result(PredictionResult),
}

/// Blocking user-facing notification for failed predictions.
pub trait Notifier {
    fn prediction_failed(&self, failure: &PredictionFailure);
}

#[derive(Debug, thiserror::Error)]
pub enum PredictionFailure {
    #[error("could not prepare the application: {0}")]
    Coercion(#[from] CoercionError),
    #[error("could not reach backend: {0}")]
    Service(#[from] ServiceError),
}

/// Shared view of whether a prediction is in flight. Clones observe the same flag, so a
/// renderer can hold one while the controller awaits the service.
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Rc<Cell<bool>>);

impl LoadingFlag {
    pub fn is_set(&self) -> bool {
        self.0.get()
    }

    fn set(&self, value: bool) {
        self.0.set(value);
    }
}

/// Clears the loading flag when dropped, whichever way the prediction exits.
struct LoadingGuard<'a> {
    flag: &'a LoadingFlag,
}

impl<'a> LoadingGuard<'a> {
    fn engage(flag: &'a LoadingFlag) -> Self {
        flag.set(true);
        Self { flag }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

pub struct RootController<S, N> {
    service: S,
    notifier: N,
    view: ViewState,
    loading: LoadingFlag,
}

impl<S, N> RootController<S, N>
where
    S: PredictionService,
    N: Notifier,
{
    pub fn new(service: S, notifier: N) -> Self {
        Self {
            service,
            notifier,
            view: ViewState::Form,
            loading: LoadingFlag::default(),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_set()
    }

    /// Handle that tracks the loading state for as long as the caller keeps it.
    pub fn loading_flag(&self) -> LoadingFlag {
        self.loading.clone()
    }

    /// Coerce the raw record, request a prediction, and switch to the result view on success.
    /// Failures are reported through the notifier and leave the form showing.
    ///
    /// Takes `&mut self`, so a second submit cannot start while one is awaiting the service.
    pub async fn predict(&mut self, raw: ApplicationRecord) -> Result<(), PredictionFailure> {
        let outcome = {
            let _loading = LoadingGuard::engage(&self.loading);
            self.request(&raw).await
        };

        match outcome {
            Ok(result) => {
                info!(risk_label = %result.risk_label, "showing prediction result");
                self.view = ViewState::Result(result);
                Ok(())
            }
            Err(failure) => {
                warn!(error = %failure, "prediction failed");
                self.notifier.prediction_failed(&failure);
                Err(failure)
            }
        }
    }

    async fn request(&self, raw: &ApplicationRecord) -> Result<PredictionResult, PredictionFailure> {
        let request = raw.coerce()?;
        let result = self.service.predict(&request).await?;
        Ok(result)
    }

    /// Return to the form, discarding any result.
    pub fn reset(&mut self) {
        if let ViewState::Result(result) = std::mem::take(&mut self.view) {
            info!(risk_label = %result.risk_label, "result dismissed");
        }
    }
}
