//! Software model of the Monte Carlo kernel.
//!
//! [`SimulatedKernel`] implements [`RegisterBus`] with the same register
//! layout, bit encodings, and handshake as the hardware block, executing
//! the payoff reduction in `f32` on the CPU when start is asserted. It
//! exists so the full control path — programming, handshake, cache
//! discipline, read-back — runs and is tested without a device attached,
//! and it doubles as the hardware-free backend for CI machines.
//!
//! A configurable completion latency defers the DONE bit by a number of
//! status polls to exercise the busy-wait loop, and a stuck mode never
//! asserts DONE to exercise the timeout path.

use std::cell::Cell;

use crate::encode::{decode_f32, join_address};
use crate::mmio::RegisterBus;
use crate::regs::{self, ctrl};

/// Register-accurate software model of the coprocessor.
///
/// Addresses programmed into the register file must be either zero (the
/// access is skipped; used with `N = 0`) or addresses of memory owned by
/// live [`DeviceBuffer`](crate::buffer::DeviceBuffer)s in this process —
/// exactly the contract real hardware has with device-shared memory.
#[derive(Debug)]
pub struct SimulatedKernel {
    args: [u32; regs::MAP_SIZE / 4],
    status: Cell<u32>,
    polls_remaining: Cell<u32>,
    latency_polls: u32,
    stuck: bool,
}

impl Default for SimulatedKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedKernel {
    /// A kernel that asserts DONE on the first status poll.
    pub fn new() -> Self {
        Self::with_latency(0)
    }

    /// A kernel whose DONE bit asserts only after `polls` status reads.
    pub fn with_latency(polls: u32) -> Self {
        Self {
            args: [0; regs::MAP_SIZE / 4],
            status: Cell::new(ctrl::AP_IDLE),
            polls_remaining: Cell::new(0),
            latency_polls: polls,
            stuck: false,
        }
    }

    /// A faulty kernel that never asserts DONE.
    pub fn stuck() -> Self {
        Self {
            stuck: true,
            ..Self::new()
        }
    }

    /// Runs the payoff reduction exactly as the hardware block would:
    /// all arithmetic in `f32`, drift and diffusion precomputed once.
    fn execute(&self) {
        let input_addr = join_address(
            self.args[regs::INPUT_ADDR_LO / 4],
            self.args[regs::INPUT_ADDR_HI / 4],
        );
        let output_addr = join_address(
            self.args[regs::OUTPUT_ADDR_LO / 4],
            self.args[regs::OUTPUT_ADDR_HI / 4],
        );
        let n = self.args[regs::SAMPLE_COUNT / 4] as usize;

        let spot = decode_f32(self.args[regs::SPOT / 4]);
        let strike = decode_f32(self.args[regs::STRIKE / 4]);
        let maturity = decode_f32(self.args[regs::MATURITY / 4]);
        let rate = decode_f32(self.args[regs::RATE / 4]);
        let sigma = decode_f32(self.args[regs::SIGMA / 4]);

        let drift = (rate - 0.5 * sigma * sigma) * maturity;
        let vol_dt = sigma * maturity.sqrt();

        let mut sum = 0.0f32;
        if n > 0 && input_addr != 0 {
            // SAFETY: the programmed input address points to a live
            // DeviceBuffer of at least n f32s per this type's contract;
            // f32 has no validity invariants beyond its bit pattern.
            let samples = unsafe { std::slice::from_raw_parts(input_addr as *const f32, n) };
            for &z in samples {
                let terminal = spot * (drift + vol_dt * z).exp();
                sum += (terminal - strike).max(0.0);
            }
        }

        if output_addr != 0 {
            // SAFETY: the programmed output address points to a live
            // single-element DeviceBuffer per this type's contract;
            // volatile write models the device's DMA store.
            unsafe {
                std::ptr::write_volatile(output_addr as *mut f32, sum);
            }
        }
    }
}

impl RegisterBus for SimulatedKernel {
    fn read32(&self, offset: usize) -> u32 {
        if offset == regs::CTRL {
            let status = self.status.get();
            // Busy and counting down: model completion latency per poll.
            if status & (ctrl::AP_DONE | ctrl::AP_IDLE) == 0 && !self.stuck {
                let remaining = self.polls_remaining.get();
                if remaining <= 1 {
                    self.status.set(ctrl::AP_DONE | ctrl::AP_IDLE);
                } else {
                    self.polls_remaining.set(remaining - 1);
                }
            }
            return self.status.get();
        }
        self.args[offset / 4]
    }

    fn write32(&mut self, offset: usize, value: u32) {
        if offset == regs::CTRL {
            if value & ctrl::AP_START != 0 {
                if self.stuck {
                    // Fault model: consumes the start, never completes.
                    self.status.set(0);
                    return;
                }
                self.execute();
                if self.latency_polls == 0 {
                    self.status.set(ctrl::AP_DONE | ctrl::AP_IDLE);
                } else {
                    self.status.set(0);
                    self.polls_remaining.set(self.latency_polls);
                }
            }
            return;
        }
        self.args[offset / 4] = value;
    }
}
