//! Device layer for the Monte Carlo pricing coprocessor.
//!
//! The coprocessor executes the European call payoff reduction in
//! hardware and is reached through a small AXI-Lite-style register file
//! plus two device-shared buffers (the input sample array and a
//! single-element output accumulator). This crate owns the whole control
//! path:
//!
//! 1. [`encode`] — bit-level parameter encoding: 64-bit buffer addresses
//!    split into paired 32-bit registers, IEEE-754 scalars reinterpreted
//!    as raw 32-bit words.
//! 2. [`RegisterImage`] — the full register file contents for one run as
//!    a first-class value, built atomically and written in one pass.
//! 3. [`DeviceBuffer`] — CPU/device-shared memory with explicit flush
//!    before device start and invalidate-then-read as the *only* read
//!    path after completion.
//! 4. [`AcceleratorController`] — the Idle/Running/Done handshake:
//!    program, fire-and-forget start, bounded cancellable busy-poll on
//!    the DONE bit.
//! 5. [`SimulatedKernel`] — a register-accurate software model of the
//!    device for hardware-free execution and tests.
//!
//! [`price_on_accelerator`] strings these together into the complete
//! offload sequence.

pub mod buffer;
pub mod controller;
pub mod encode;
pub mod error;
pub mod mmio;
pub mod offload;
pub mod registers;
pub mod regs;
pub mod sim;

pub use buffer::{DeviceBuffer, DeviceBufferManager};
pub use controller::{AcceleratorController, ControllerState, PollConfig};
pub use error::DriverError;
pub use mmio::{MappedRegisters, RegisterBus};
pub use offload::price_on_accelerator;
pub use registers::RegisterImage;
pub use sim::SimulatedKernel;
