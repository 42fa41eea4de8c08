use thiserror::Error;

/// Invalid interaction configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{name} must be greater than zero")]
    ZeroWindow { name: &'static str },
}
