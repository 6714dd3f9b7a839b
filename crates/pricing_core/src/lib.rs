//! Domain layer for the Monte Carlo option pricer.
//!
//! This crate holds everything that is independent of the accelerator:
//! validated pricing parameters, the seeded standard-normal sample source,
//! the software evaluation of the terminal-price payoff sum (the oracle
//! against which the hardware path is judged), and the discounting /
//! reporting records shared by both backends.
//!
//! # Layering
//!
//! `pricing_core` has no knowledge of registers, buffers, or devices.
//! The device layer (`accel_driver`) consumes [`OptionParams`] and the
//! sample array produced here and returns the same [`KernelRun`] record
//! the software path produces, so the two backends are directly
//! comparable.

pub mod error;
pub mod params;
pub mod pricer;
pub mod report;
pub mod sample;

pub use error::ParameterError;
pub use params::OptionParams;
pub use pricer::software_payoff_sum;
pub use report::{BackendReport, ComparisonReport, KernelRun};
pub use sample::SampleSource;
