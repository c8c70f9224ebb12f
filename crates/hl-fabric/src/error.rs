//! Error types for fabric operations.

use hl_core::HlError;
use thiserror::Error;

/// Errors raised while describing constructions or synthesising their response.
#[derive(Error, Debug)]
pub enum FabricError {
    #[error("Invalid layer: {what}")]
    InvalidLayer { what: String },

    #[error("Construction '{what}' has no layers")]
    NoLayers { what: &'static str },

    #[error("Invalid construction: {what}")]
    InvalidConstruction { what: String },

    #[error("Response fit is ill-conditioned (condition number {condition:.3e} > {limit:.3e})")]
    IllConditioned { condition: f64, limit: f64 },

    #[error("Response fit failed: {what}")]
    FitFailed { what: String },

    #[error("Core error: {0}")]
    Core(#[from] HlError),
}

pub type FabricResult<T> = Result<T, FabricError>;
