//! Error type shared by the drivers and the public API.

use thiserror::Error;

/// Failure of a Bessel or Airy evaluation.
///
/// Underflow is not an error: it is reported through the underflow count
/// of a successful result.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// Malformed argument: negative order, empty run, `z = 0` where the
    /// function is singular, or an order too large to index.
    #[error("invalid input: check z, order and run length")]
    InvalidInput,
    /// The result magnitude exceeds the representable range.
    #[error("overflow: result magnitude exceeds representable range")]
    Overflow,
    /// `|z|` or the order is so large that no significant digit remains.
    #[error("total precision loss: no significant digits remain")]
    TotalPrecisionLoss,
    /// A series or recurrence did not meet its termination test.
    #[error("convergence failure: algorithm did not meet termination criteria")]
    ConvergenceFailure,
}

impl Error {
    /// Status code of the integer calling convention.
    pub fn code(self) -> i32 {
        match self {
            Error::InvalidInput => 1,
            Error::Overflow => 2,
            Error::TotalPrecisionLoss => 4,
            Error::ConvergenceFailure => 5,
        }
    }
}
