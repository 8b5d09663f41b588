//! Parsing and validation of waste-classification results.
//!
//! The third-party image model is prompted to answer with a JSON object of
//! `{wasteType, quantity, confidence}`. Model output is free text, so
//! anything that does not parse into exactly that shape is treated as a
//! failed verification rather than an error to retry automatically.

use serde::{Deserialize, Serialize};

/// Parsed classification result for a waste image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    /// e.g. `"plastic"`, `"paper"`, `"organic"`.
    pub waste_type: String,
    /// Estimated quantity with unit, e.g. `"2.5 kg"`.
    pub quantity: String,
    /// Model confidence in `[0, 1]`.
    pub confidence: f64,
}

/// Why a model response failed verification.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("Response is not valid verification JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Field `{0}` is empty")]
    EmptyField(&'static str),

    #[error("Confidence {0} is outside [0, 1]")]
    ConfidenceOutOfRange(f64),
}

/// Parse a raw model response into a [`VerificationResult`].
///
/// Requires all three fields to be present and well-formed: non-empty
/// `wasteType` and `quantity` strings, and a `confidence` number in `[0, 1]`.
pub fn parse_verification(text: &str) -> Result<VerificationResult, VerificationError> {
    let result: VerificationResult = serde_json::from_str(text.trim())?;
    validate_verification(&result)?;
    Ok(result)
}

/// Validate an already-deserialized result (e.g. one submitted by a client
/// alongside a report).
pub fn validate_verification(result: &VerificationResult) -> Result<(), VerificationError> {
    if result.waste_type.trim().is_empty() {
        return Err(VerificationError::EmptyField("wasteType"));
    }
    if result.quantity.trim().is_empty() {
        return Err(VerificationError::EmptyField("quantity"));
    }
    if !(0.0..=1.0).contains(&result.confidence) {
        return Err(VerificationError::ConfidenceOutOfRange(result.confidence));
    }
    Ok(())
}
