use crate::types::LifecycleState;

/// Failure to turn raw response bytes back into words.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// The checksum trailing word `word` did not match.
    #[error("checksum mismatch in word {word}")]
    Checksum { word: usize },
    /// The buffer does not hold exactly three bytes per expected word.
    #[error("expected {expected} response bytes, got {actual}")]
    Length { expected: usize, actual: usize },
}

/// SPS30 driver errors.
#[derive(Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The bus transfer itself failed.
    #[error("I2C transfer failed: {0:?}")]
    I2c(E),
    /// A received word failed checksum validation; the whole response was discarded.
    #[error("checksum mismatch in response word {word}")]
    Checksum { word: usize },
    /// Response length does not match the number of words requested.
    #[error("expected {expected} response bytes, got {actual}")]
    Length { expected: usize, actual: usize },
    /// The operation is not valid in the driver's current lifecycle state.
    #[error("{operation} is not allowed while {state:?}")]
    State {
        operation: &'static str,
        state: LifecycleState,
    },
    /// An identity string contained non-ASCII bytes.
    #[error("sensor returned a non-ASCII identity string")]
    InvalidString,
}

impl<E> From<FrameError> for Error<E> {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::Checksum { word } => Error::Checksum { word },
            FrameError::Length { expected, actual } => Error::Length { expected, actual },
        }
    }
}
