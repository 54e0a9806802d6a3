//! Declarative record shapes and the validation gate
//!
//! A [`Shape`] describes the nested structure a record must have: which
//! fields exist, which are required, and what JSON type each holds. The
//! validator walks a serialized record against a shape and reports the first
//! violated field path. A rejection is a "try again later" signal; the source
//! page may simply have rendered without the section the field comes from.

mod merchant;
mod shape;

pub use merchant::merchant_shape;
pub use shape::{validate, Field, Shape, ValidationError, Violation};

use crate::extract::CandidateRecord;
use crate::target::TargetId;

/// A candidate record that conforms to [`merchant_shape`]
///
/// Only [`validate_record`] constructs one, so holding a `ValidatedRecord`
/// is proof the record passed the gate.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord {
    id: TargetId,
    record: CandidateRecord,
}

impl ValidatedRecord {
    pub fn id(&self) -> &TargetId {
        &self.id
    }

    pub fn record(&self) -> &CandidateRecord {
        &self.record
    }

    /// Pretty JSON rendering used by the audit writer and the record sink
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.record)
    }
}

/// Checks a candidate against the merchant shape
pub fn validate_record(
    id: &TargetId,
    candidate: CandidateRecord,
) -> Result<ValidatedRecord, ValidationError> {
    let value = serde_json::to_value(&candidate).map_err(|e| ValidationError {
        path: "$".to_string(),
        violation: Violation::Unserializable(e.to_string()),
    })?;

    validate(merchant_shape(), &value)?;

    Ok(ValidatedRecord {
        id: id.clone(),
        record: candidate,
    })
}
