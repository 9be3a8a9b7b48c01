//! Applicant record model: the field catalogue, raw form values, and the coerced request body.

pub mod fields;
pub mod record;

#[cfg(test)]
pub(crate) mod fixtures;

pub use fields::{Field, FieldKind};
pub use record::{ApplicationRecord, CoercionError, DefaultsRecord, PredictionRequest};
