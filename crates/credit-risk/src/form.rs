//! Applicant form: defaults initialisation, field editing, and native constraint checks.

use tracing::{error, info};

use crate::application::{ApplicationRecord, DefaultsRecord, Field, FieldKind};
use crate::service::PredictionService;

/// Initialisation progress of the form's server defaults.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultsState {
    Loading,
    Ready(DefaultsRecord),
    Failed(String),
}

/// Editable applicant form. Owns the in-progress record until it is submitted.
#[derive(Debug)]
pub struct FormComponent {
    state: DefaultsState,
    values: ApplicationRecord,
}

impl Default for FormComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl FormComponent {
    pub fn new() -> Self {
        Self {
            state: DefaultsState::Loading,
            values: ApplicationRecord::new(),
        }
    }

    pub fn state(&self) -> &DefaultsState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, DefaultsState::Ready(_))
    }

    /// Fetch defaults and merge them into the form. A failed form may call this again to retry;
    /// a ready form keeps its defaults and does not refetch.
    pub async fn load<S: PredictionService>(&mut self, service: &S) -> &DefaultsState {
        if self.is_ready() {
            return &self.state;
        }
        self.state = DefaultsState::Loading;

        match service.fetch_defaults().await {
            Ok(defaults) => {
                for (field, value) in defaults.field_values() {
                    self.values.set(field, value);
                }
                info!(fields = defaults.as_map().len(), "form initialised from defaults");
                self.state = DefaultsState::Ready(defaults);
            }
            Err(err) => {
                error!(error = %err, "failed to load form defaults");
                self.state = DefaultsState::Failed(err.to_string());
            }
        }
        &self.state
    }

    pub fn value(&self, field: Field) -> Option<&str> {
        self.values.get(field)
    }

    pub fn values(&self) -> &ApplicationRecord {
        &self.values
    }

    /// Replace one field's text. Takes effect immediately.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> Result<(), FormError> {
        self.ensure_ready()?;
        self.values.set(field, value);
        Ok(())
    }

    /// Validate every field against its input constraint and hand back the raw values.
    pub fn submit(&self) -> Result<ApplicationRecord, FormError> {
        self.ensure_ready()?;

        let missing = self.values.missing();
        if !missing.is_empty() {
            return Err(FormError::MissingFields(missing));
        }

        for (field, value) in self.values.iter() {
            check_constraint(field, value)?;
        }

        Ok(self.values.clone())
    }

    fn ensure_ready(&self) -> Result<(), FormError> {
        match &self.state {
            DefaultsState::Ready(_) => Ok(()),
            DefaultsState::Loading => Err(FormError::NotReady),
            DefaultsState::Failed(reason) => Err(FormError::DefaultsUnavailable {
                reason: reason.clone(),
            }),
        }
    }
}

fn check_constraint(field: Field, value: &str) -> Result<(), FormError> {
    match field.kind() {
        FieldKind::Numeric { min, max } => {
            let value = value.trim();
            let number = value
                .parse::<f64>()
                .ok()
                .filter(|number| number.is_finite())
                .ok_or_else(|| FormError::NotNumeric {
                    field,
                    value: value.to_string(),
                })?;
            if number < min || number > max {
                return Err(FormError::OutOfRange {
                    field,
                    value: number,
                    min,
                    max,
                });
            }
        }
        // Option values go on the wire verbatim, so they must match exactly.
        FieldKind::Categorical { options } => {
            if !options.contains(&value) {
                return Err(FormError::UnknownOption {
                    field,
                    value: value.to_string(),
                    options,
                });
            }
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("the form is still waiting for its defaults")]
    NotReady,
    #[error("form defaults could not be loaded: {reason}")]
    DefaultsUnavailable { reason: String },
    #[error("required fields are empty: {}", format_fields(.0))]
    MissingFields(Vec<Field>),
    #[error("{} must be a number, got '{value}'", .field.label())]
    NotNumeric { field: Field, value: String },
    #[error("{} must be between {min} and {max}, got {value}", .field.label())]
    OutOfRange {
        field: Field,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{} must be one of {}, got '{value}'", .field.label(), .options.join(", "))]
    UnknownOption {
        field: Field,
        value: String,
        options: &'static [&'static str],
    },
}

fn format_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ")
}
