//! The complete accelerator offload sequence.
//!
//! Buffers first, registers second, start/poll third, invalidate-then-
//! read last. Every step that can fail aborts only this backend's run;
//! the caller's software result stays valid.

use pricing_core::{KernelRun, OptionParams};
use tracing::{debug, info};

use crate::buffer::DeviceBufferManager;
use crate::controller::{AcceleratorController, PollConfig};
use crate::error::DriverError;
use crate::mmio::RegisterBus;
use crate::registers::RegisterImage;

/// Prices the option on the accelerator reached through `bus`.
///
/// Sequence: allocate the input and output regions (one retry each),
/// copy and flush the sample array, build and program the register
/// image, assert start, busy-poll DONE under `poll`, then invalidate the
/// CPU view of the accumulator and read it back. The returned duration
/// covers start-assert to done-detect only.
///
/// # Errors
///
/// - [`DriverError::TransferSize`] if `samples` does not match the
///   parameter sample count.
/// - [`DriverError::Allocation`] if device-shared memory is unavailable
///   after the retry.
/// - [`DriverError::Encoding`] for parameters the register file cannot
///   represent.
/// - [`DriverError::Timeout`] / [`DriverError::Cancelled`] from the
///   bounded wait.
pub fn price_on_accelerator<B: RegisterBus>(
    params: &OptionParams,
    samples: &[f32],
    bus: B,
    poll: &PollConfig,
) -> Result<KernelRun, DriverError> {
    let n = params.n_samples();
    if samples.len() != n {
        return Err(DriverError::TransferSize {
            expected: n,
            actual: samples.len(),
        });
    }

    let mut manager = DeviceBufferManager::new();
    let mut input = manager.allocate_with_retry(n)?;
    let mut output = manager.allocate_with_retry(1)?;

    input.write(samples)?;
    input.flush();
    output.flush();

    let image = RegisterImage::for_run(params, input.device_address(), output.device_address())?;
    debug!(
        "offload prepared: {} samples, input at {:#x}, output at {:#x}",
        n,
        input.device_address(),
        output.device_address()
    );

    let mut controller = AcceleratorController::new(bus);
    controller.program(&image)?;
    let elapsed = controller.run_and_wait(poll)?;
    controller.reset()?;

    let payoff_sum = output.sync_read()[0] as f64;
    info!(payoff_sum, ?elapsed, "accelerator run complete");

    Ok(KernelRun {
        payoff_sum,
        elapsed,
    })
}
