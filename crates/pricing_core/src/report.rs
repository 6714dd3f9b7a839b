//! Run records, discounting, and the backend comparison report.

use std::fmt;
use std::time::Duration;

use crate::params::OptionParams;

/// Raw outcome of one backend invocation.
///
/// Produced once per backend and never mutated afterwards. The elapsed
/// time covers only kernel execution (the summation loop on the software
/// path, start-assert to done-detect on the hardware path).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KernelRun {
    /// Summed undiscounted call payoff over all samples.
    pub payoff_sum: f64,
    /// Kernel-only wall-clock duration.
    pub elapsed: Duration,
}

/// Discounted result of one backend, ready for rendering.
///
/// `present_value = exp(-r T) * payoff_sum / N`, defined as zero for a
/// degenerate run with `N = 0` (no division is performed).
#[derive(Clone, Debug, PartialEq)]
pub struct BackendReport {
    /// Backend label, e.g. "CPU" or "FPGA".
    pub label: String,
    /// Raw payoff sum from the kernel.
    pub payoff_sum: f64,
    /// Discounted per-sample expectation.
    pub present_value: f64,
    /// Kernel-only elapsed time.
    pub elapsed: Duration,
}

impl BackendReport {
    /// Discounts a raw kernel run into a reportable present value.
    pub fn from_run(label: impl Into<String>, run: &KernelRun, params: &OptionParams) -> Self {
        let n = params.n_samples();
        let present_value = if n == 0 {
            0.0
        } else {
            params.discount_factor() * run.payoff_sum / n as f64
        };

        Self {
            label: label.into(),
            payoff_sum: run.payoff_sum,
            present_value,
            elapsed: run.elapsed,
        }
    }
}

impl fmt::Display for BackendReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} payoff sum: ${:.2}", self.label, self.payoff_sum)?;
        writeln!(f, "{} option price: ${:.2}", self.label, self.present_value)?;
        write!(
            f,
            "{} kernel time: {:.2} ms",
            self.label,
            self.elapsed.as_secs_f64() * 1e3
        )
    }
}

/// Side-by-side comparison of the two backends.
#[derive(Clone, Debug)]
pub struct ComparisonReport {
    /// Software reference backend.
    pub software: BackendReport,
    /// Accelerator backend, absent if the hardware path failed.
    pub accelerator: Option<BackendReport>,
}

impl ComparisonReport {
    /// Speedup of the accelerator over the software path, if both ran.
    ///
    /// Returns `None` when the accelerator result is missing or either
    /// duration is zero.
    pub fn speedup(&self) -> Option<f64> {
        let accel = self.accelerator.as_ref()?;
        let sw = self.software.elapsed.as_secs_f64();
        let hw = accel.elapsed.as_secs_f64();
        if sw > 0.0 && hw > 0.0 {
            Some(sw / hw)
        } else {
            None
        }
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.software)?;
        if let Some(accel) = &self.accelerator {
            write!(f, "\n\n{}", accel)?;
            if let Some(speedup) = self.speedup() {
                write!(f, "\nSpeedup: {:.2}x", speedup)?;
            }
        }
        Ok(())
    }
}
