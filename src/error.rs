use thiserror::Error;

/// Configuration problems caught at the parameter boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("grid resolution {0} is outside [{}, {}]", crate::params::MIN_RESOLUTION, crate::params::MAX_RESOLUTION)]
    Resolution(usize),

    #[error("{name} must be finite and within [0, 1], got {value}")]
    OutOfUnitRange { name: &'static str, value: f32 },
}
