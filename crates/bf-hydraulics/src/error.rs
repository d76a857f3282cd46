//! Error types for hydraulic calculations.

use bf_core::error::BfError;
use thiserror::Error;

/// Errors that can occur in hydraulic calculations and fitting lookups.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HydraulicError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Unknown fitting '{name}' for {material} table")]
    UnknownFitting { name: String, material: String },

    #[error("Fitting table for {material} is invalid: {reason}")]
    InvalidTable { material: String, reason: String },
}

pub type HydraulicResult<T> = Result<T, HydraulicError>;

impl From<BfError> for HydraulicError {
    fn from(e: BfError) -> Self {
        match e {
            BfError::NonFinite { what, .. } => HydraulicError::NonPhysical { what },
        }
    }
}
