//! Accelerator control: program, start, bounded busy-poll.
//!
//! The controller drives the kernel's handshake as an explicit state
//! machine:
//!
//! ```text
//! Idle --program()--> Idle --start()--> Running --DONE observed--> Done --reset()--> Idle
//! ```
//!
//! `start` is a single fire-and-forget control-register write; the
//! kernel then runs while the host busy-polls the DONE bit. The poll is
//! bounded by an injected [`PollConfig`] (deadline plus cooperative
//! cancellation flag) so a stalled device surfaces as a reported error
//! instead of hanging the calling process.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::error::DriverError;
use crate::mmio::RegisterBus;
use crate::registers::RegisterImage;
use crate::regs::{self, ctrl};

/// Handshake state of the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    /// Quiescent; registers may be programmed.
    Idle,
    /// Start asserted, DONE not yet observed.
    Running,
    /// DONE observed; output may be read back, then reset.
    Done,
}

/// Bounds for the busy-poll wait.
///
/// The baseline design polled unboundedly; whether the hardware
/// guarantees bounded completion time is a platform property, so the
/// deadline is explicit configuration rather than an assumption.
#[derive(Clone, Debug)]
pub struct PollConfig {
    /// Maximum wait before [`DriverError::Timeout`]; `None` polls forever.
    pub timeout: Option<Duration>,
    /// Cooperative cancellation flag checked on every poll iteration.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(2)),
            cancel: None,
        }
    }
}

impl PollConfig {
    /// A poll bounded only by the given deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..Self::default()
        }
    }
}

/// Driver for the Monte Carlo kernel's control register file.
///
/// Owns the register bus for its lifetime; buffers are referenced only
/// by the address values baked into the [`RegisterImage`].
#[derive(Debug)]
pub struct AcceleratorController<B: RegisterBus> {
    bus: B,
    state: ControllerState,
    programmed: bool,
    started_at: Option<Instant>,
}

impl<B: RegisterBus> AcceleratorController<B> {
    /// Creates a controller over the given bus, starting Idle.
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            state: ControllerState::Idle,
            programmed: false,
            started_at: None,
        }
    }

    /// Returns the current handshake state.
    #[inline]
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Consumes the controller, returning the bus.
    pub fn into_bus(self) -> B {
        self.bus
    }

    /// Programs the argument registers from the image.
    ///
    /// # Errors
    ///
    /// [`DriverError::InvalidState`] unless the controller is Idle.
    pub fn program(&mut self, image: &RegisterImage) -> Result<(), DriverError> {
        if self.state != ControllerState::Idle {
            return Err(DriverError::InvalidState {
                operation: "program registers",
                state: self.state,
            });
        }
        image.write_to(&mut self.bus);
        self.programmed = true;
        debug!(sample_count = image.sample_count, "programmed register file");
        Ok(())
    }

    /// Asserts the start bit. Fire-and-forget: returns immediately after
    /// the single control-register write.
    ///
    /// # Errors
    ///
    /// [`DriverError::InvalidState`] unless the controller is Idle with
    /// registers programmed.
    pub fn start(&mut self) -> Result<(), DriverError> {
        if self.state != ControllerState::Idle || !self.programmed {
            return Err(DriverError::InvalidState {
                operation: "assert start",
                state: self.state,
            });
        }
        self.started_at = Some(Instant::now());
        self.bus.write32(regs::CTRL, ctrl::AP_START);
        self.state = ControllerState::Running;
        debug!("start asserted");
        Ok(())
    }

    /// Busy-polls the DONE bit until completion, deadline, or cancellation.
    ///
    /// Returns the duration from start-assert to done-detect: kernel
    /// execution only, excluding allocation and transfer time.
    ///
    /// On timeout or cancellation the controller stays Running — the
    /// device state is unknown and the handshake cannot be resumed.
    ///
    /// # Errors
    ///
    /// - [`DriverError::InvalidState`] unless the controller is Running.
    /// - [`DriverError::Timeout`] when the deadline expires.
    /// - [`DriverError::Cancelled`] when the cancellation flag is set.
    pub fn wait_done(&mut self, poll: &PollConfig) -> Result<Duration, DriverError> {
        if self.state != ControllerState::Running {
            return Err(DriverError::InvalidState {
                operation: "wait for done",
                state: self.state,
            });
        }
        // started_at is always set on the Idle -> Running transition.
        let started = self.started_at.unwrap_or_else(Instant::now);

        loop {
            let status = self.bus.read32(regs::CTRL);
            if status & ctrl::AP_DONE != 0 {
                let elapsed = started.elapsed();
                self.state = ControllerState::Done;
                debug!(?elapsed, "done observed");
                return Ok(elapsed);
            }
            trace!(status, "polling");

            if let Some(cancel) = &poll.cancel {
                if cancel.load(Ordering::Relaxed) {
                    return Err(DriverError::Cancelled {
                        waited: started.elapsed(),
                    });
                }
            }
            if let Some(timeout) = poll.timeout {
                let waited = started.elapsed();
                if waited >= timeout {
                    return Err(DriverError::Timeout { waited });
                }
            }
            std::hint::spin_loop();
        }
    }

    /// Asserts start and blocks until DONE, returning the kernel time.
    pub fn run_and_wait(&mut self, poll: &PollConfig) -> Result<Duration, DriverError> {
        self.start()?;
        self.wait_done(poll)
    }

    /// Returns the controller to Idle after a completed run.
    ///
    /// The register file must be reprogrammed before the next start.
    ///
    /// # Errors
    ///
    /// [`DriverError::InvalidState`] unless the controller is Done.
    pub fn reset(&mut self) -> Result<(), DriverError> {
        if self.state != ControllerState::Done {
            return Err(DriverError::InvalidState {
                operation: "reset",
                state: self.state,
            });
        }
        self.state = ControllerState::Idle;
        self.programmed = false;
        self.started_at = None;
        Ok(())
    }
}
