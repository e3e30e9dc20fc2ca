use crate::types::MAX_STOPS;

/// Errors raised while building gradient values.
///
/// Stop lists are never truncated: a list that does not fit the shader's fixed
/// slot table is rejected outright.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GradientError {
    #[error("gradient has {count} colour stops; at most {MAX_STOPS} are supported")]
    TooManyStops { count: usize },
    #[error("gradient requires at least one colour stop")]
    NoStops,
    #[error("invalid colour '{0}'")]
    InvalidColor(String),
}
