use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::fields::Field;

/// Raw field text exactly as the applicant entered it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationRecord {
    values: BTreeMap<Field, String>,
}

impl ApplicationRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    /// Fields with no value or only whitespace.
    pub fn missing(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| self.get(*field).map_or(true, |value| value.trim().is_empty()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.values
            .iter()
            .map(|(field, value)| (*field, value.as_str()))
    }

    /// Convert the seven numeric fields to numbers, leaving categorical values untouched.
    pub fn coerce(&self) -> Result<PredictionRequest, CoercionError> {
        let number = |field: Field| -> Result<f64, CoercionError> {
            let raw = self.get(field).ok_or(CoercionError::Missing { field })?;
            raw.trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| CoercionError::NotNumeric {
                    field,
                    value: raw.to_string(),
                })
        };
        let text = |field: Field| -> Result<String, CoercionError> {
            self.get(field)
                .map(str::to_string)
                .ok_or(CoercionError::Missing { field })
        };

        Ok(PredictionRequest {
            person_age: number(Field::PersonAge)?,
            person_income: number(Field::PersonIncome)?,
            person_emp_length: number(Field::PersonEmpLength)?,
            loan_amnt: number(Field::LoanAmnt)?,
            loan_int_rate: number(Field::LoanIntRate)?,
            loan_percent_income: number(Field::LoanPercentIncome)?,
            cb_person_cred_hist_length: number(Field::CbPersonCredHistLength)?,
            person_home_ownership: text(Field::PersonHomeOwnership)?,
            loan_intent: text(Field::LoanIntent)?,
            loan_grade: text(Field::LoanGrade)?,
            cb_person_default_on_file: text(Field::CbPersonDefaultOnFile)?,
        })
    }
}

/// Body of `POST /api/predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub person_age: f64,
    pub person_income: f64,
    pub person_emp_length: f64,
    pub loan_amnt: f64,
    pub loan_int_rate: f64,
    pub loan_percent_income: f64,
    pub cb_person_cred_hist_length: f64,
    pub person_home_ownership: String,
    pub loan_intent: String,
    pub loan_grade: String,
    pub cb_person_default_on_file: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoercionError {
    #[error("{field} has no value")]
    Missing { field: Field },
    #[error("{field} must be a number, got '{value}'")]
    NotNumeric { field: Field, value: String },
}

/// Baseline field values served by `GET /api/defaults`. May cover only some fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefaultsRecord(BTreeMap<String, Value>);

impl DefaultsRecord {
    pub fn from_map(values: BTreeMap<String, Value>) -> Self {
        Self(values)
    }

    pub fn as_map(&self) -> &BTreeMap<String, Value> {
        &self.0
    }

    /// Known fields rendered as input text. Unknown keys and non-scalar values are skipped.
    pub fn field_values(&self) -> Vec<(Field, String)> {
        let mut resolved = Vec::new();
        for (key, value) in &self.0 {
            let Some(field) = Field::from_name(key) else {
                continue;
            };
            let text = match value {
                Value::Number(number) => number.to_string(),
                Value::String(text) => text.clone(),
                other => {
                    warn!(field = %field, value = %other, "ignoring non-scalar default");
                    continue;
                }
            };
            resolved.push((field, text));
        }
        resolved
    }
}
