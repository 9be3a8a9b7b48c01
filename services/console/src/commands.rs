use crate::cli::{GlobalArgs, PredictArgs};
use credit_risk::config::{AppConfig, ServiceConfig};
use credit_risk::controller::{Notifier, PredictionFailure, RootController, ViewState};
use credit_risk::error::AppError;
use credit_risk::form::{DefaultsState, FormComponent, FormError};
use credit_risk::result::ResultView;
use credit_risk::service::{HttpPredictionService, PredictionService};
use credit_risk::session::{ConsoleSession, StderrNotifier};
use credit_risk::telemetry;
use std::io::{self, IsTerminal};
use tracing::{debug, info};

/// Batch runs report failures through the process exit instead of an interactive alert.
struct LogNotifier;

impl Notifier for LogNotifier {
    fn prediction_failed(&self, failure: &PredictionFailure) {
        debug!(error = %failure, "prediction failure surfaced to caller");
    }
}

fn prepare(global: &GlobalArgs) -> Result<HttpPredictionService, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(url) = global.service_url.clone() {
        config.service = ServiceConfig::new(url)?;
    }

    telemetry::init(&config.telemetry)?;
    info!(?config.environment, service = %config.service.base_url, "credit risk client configured");

    Ok(HttpPredictionService::new(config.service.base_url))
}

fn use_color(global: &GlobalArgs) -> bool {
    !global.no_color && io::stdout().is_terminal()
}

pub(crate) async fn run_interactive(global: GlobalArgs) -> Result<(), AppError> {
    let service = prepare(&global)?;
    let controller = RootController::new(service, StderrNotifier);

    let mut session = ConsoleSession::new(controller, io::stdin().lock(), io::stdout().lock())
        .with_color(use_color(&global));
    session.run().await?;
    Ok(())
}

pub(crate) async fn run_defaults(global: GlobalArgs) -> Result<(), AppError> {
    let service = prepare(&global)?;
    let defaults = service.fetch_defaults().await?;

    let rendered = serde_json::to_string_pretty(defaults.as_map()).map_err(io::Error::from)?;
    println!("{rendered}");
    Ok(())
}

pub(crate) async fn run_predict(global: GlobalArgs, args: PredictArgs) -> Result<(), AppError> {
    let service = prepare(&global)?;

    let mut form = FormComponent::new();
    if let DefaultsState::Failed(reason) = form.load(&service).await {
        return Err(FormError::DefaultsUnavailable {
            reason: reason.clone(),
        }
        .into());
    }
    for (field, value) in args.overrides {
        form.set_field(field, value)?;
    }
    let record = form.submit()?;

    let mut controller = RootController::new(service, LogNotifier);
    controller.predict(record).await?;

    if let ViewState::Result(result) = controller.view() {
        let card = ResultView::new(result).with_color(use_color(&global)).render();
        print!("{card}");
    }
    Ok(())
}
