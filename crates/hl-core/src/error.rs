use thiserror::Error;

pub type HlResult<T> = Result<T, HlError>;

/// Input errors shared by every layer of the model.
#[derive(Error, Debug)]
pub enum HlError {
    #[error("Non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Series '{what}' has no values")]
    EmptySeries { what: &'static str },

    #[error("Invalid building topology: {what}")]
    Topology { what: String },
}
