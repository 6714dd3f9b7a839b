//! Error types for the accelerator driver.

use std::time::Duration;

use thiserror::Error;

use crate::controller::ControllerState;
use crate::encode::EncodeError;

/// Result type alias for driver operations.
pub type Result<T> = std::result::Result<T, DriverError>;

/// Errors that can occur on the accelerator control path.
///
/// Allocation and encoding failures abort only the hardware backend's
/// run; the software result remains valid and reportable. A timeout is
/// a recoverable, reported failure (the baseline design would have hung
/// forever).
#[derive(Debug, Error)]
pub enum DriverError {
    /// Device-shared memory could not be provided.
    #[error("Device-shared allocation of {bytes} bytes failed")]
    Allocation {
        /// Requested size in bytes.
        bytes: usize,
    },

    /// A scalar parameter could not be encoded for the register file.
    #[error(transparent)]
    Encoding(#[from] EncodeError),

    /// Operation attempted in the wrong controller state.
    #[error("Cannot {operation} while controller is {state:?}")]
    InvalidState {
        /// Operation that was attempted.
        operation: &'static str,
        /// State the controller was in.
        state: ControllerState,
    },

    /// The DONE bit never asserted within the configured deadline.
    ///
    /// Carries the waited duration so callers can distinguish a slow
    /// device (raise the deadline, retry) from a faulty one.
    #[error("Device did not assert DONE within {waited:?}")]
    Timeout {
        /// How long the poll loop waited.
        waited: Duration,
    },

    /// The wait was cancelled cooperatively.
    #[error("Wait cancelled after {waited:?}")]
    Cancelled {
        /// How long the poll loop had waited.
        waited: Duration,
    },

    /// Host data does not fit the buffer it is being copied into.
    #[error("Transfer size mismatch: buffer holds {expected} elements, got {actual}")]
    TransferSize {
        /// Buffer capacity in elements.
        expected: usize,
        /// Supplied element count.
        actual: usize,
    },
}
