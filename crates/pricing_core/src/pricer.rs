//! Software Monte Carlo evaluation of the European call payoff sum.
//!
//! This is the reference backend: a direct, sequential evaluation of the
//! terminal-price recurrence over the shared sample array. It serves as
//! both the correctness oracle for the accelerator path and the baseline
//! timing.

use std::time::Instant;

use crate::params::OptionParams;
use crate::report::KernelRun;

/// Computes the summed terminal payoff over the sample array.
///
/// For each standard-normal draw `z`, the terminal price is
/// `S_T = S0 * exp((r - 0.5 sigma^2) T + sigma sqrt(T) z)` and the call
/// payoff is `max(S_T - K, 0)`. Summation runs in the supplied sample
/// order (order affects floating-point rounding, not correctness within
/// tolerance), accumulating in `f64`.
///
/// Only the summation loop is timed; sample generation and any buffer
/// handling are excluded so the duration is comparable with the
/// accelerator's kernel-only time.
///
/// An empty sample array yields a defined zero-sum result, not an error.
pub fn software_payoff_sum(params: &OptionParams, samples: &[f32]) -> KernelRun {
    let drift = params.drift();
    let vol_sqrt_t = params.vol_sqrt_t();
    let spot = params.spot();
    let strike = params.strike();

    let t0 = Instant::now();
    let mut payoff_sum = 0.0f64;
    for &z in samples {
        let terminal = spot * (drift + vol_sqrt_t * z as f64).exp();
        payoff_sum += (terminal - strike).max(0.0);
    }
    let elapsed = t0.elapsed();

    KernelRun {
        payoff_sum,
        elapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::SampleSource;
    use approx::assert_relative_eq;

    fn reference_params(n_samples: usize) -> OptionParams {
        OptionParams::builder()
            .spot(100.0)
            .strike(105.0)
            .maturity(1.0)
            .rate(0.05)
            .volatility(0.2)
            .n_samples(n_samples)
            .build()
            .unwrap()
    }

    #[test]
    fn test_empty_samples_zero_sum() {
        let params = reference_params(0);
        let run = software_payoff_sum(&params, &[]);
        assert_eq!(run.payoff_sum, 0.0);
    }

    #[test]
    fn test_matches_independent_reference() {
        // Independently computed sum with the recurrence written out long-hand.
        let params = reference_params(1000);
        let samples = SampleSource::from_seed(42).draw(1000);

        let mut expected = 0.0f64;
        for &z in &samples {
            let exponent = (0.05 - 0.5 * 0.2 * 0.2) * 1.0 + 0.2 * 1.0f64.sqrt() * z as f64;
            let st = 100.0 * exponent.exp();
            if st > 105.0 {
                expected += st - 105.0;
            }
        }

        let run = software_payoff_sum(&params, &samples);
        assert_relative_eq!(run.payoff_sum, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_deterministic_across_runs() {
        let params = reference_params(1000);
        let samples = SampleSource::from_seed(42).draw(1000);

        let a = software_payoff_sum(&params, &samples);
        let b = software_payoff_sum(&params, &samples);
        assert_eq!(a.payoff_sum, b.payoff_sum);
    }

    #[test]
    fn test_deep_itm_payoff_dominated_by_forward() {
        // With sigma = 0 every path ends at S0 * exp(rT); strike far below.
        let params = OptionParams::builder()
            .spot(100.0)
            .strike(1.0)
            .maturity(1.0)
            .rate(0.05)
            .volatility(0.0)
            .n_samples(10)
            .build()
            .unwrap();
        let samples = vec![0.5f32; 10];

        let run = software_payoff_sum(&params, &samples);
        let terminal = 100.0 * (0.05f64).exp();
        assert_relative_eq!(run.payoff_sum, 10.0 * (terminal - 1.0), max_relative = 1e-12);
    }

    #[test]
    fn test_far_otm_zero_payoff() {
        let params = OptionParams::builder()
            .spot(1.0)
            .strike(1000.0)
            .maturity(1.0)
            .rate(0.0)
            .volatility(0.1)
            .n_samples(100)
            .build()
            .unwrap();
        let samples = SampleSource::from_seed(1).draw(100);

        let run = software_payoff_sum(&params, &samples);
        assert_eq!(run.payoff_sum, 0.0);
    }

    proptest::proptest! {
        #[test]
        fn prop_payoff_sum_non_negative(
            samples in proptest::collection::vec(-5.0f32..5.0f32, 0..256),
            strike in 1.0f64..500.0f64,
        ) {
            let params = OptionParams::builder()
                .spot(100.0)
                .strike(strike)
                .maturity(1.0)
                .rate(0.05)
                .volatility(0.2)
                .n_samples(samples.len())
                .build()
                .unwrap();
            let run = software_payoff_sum(&params, &samples);
            proptest::prop_assert!(run.payoff_sum >= 0.0);
        }

        #[test]
        fn prop_lower_strike_never_decreases_sum(
            samples in proptest::collection::vec(-5.0f32..5.0f32, 1..256),
        ) {
            let build = |strike: f64| {
                OptionParams::builder()
                    .spot(100.0)
                    .strike(strike)
                    .maturity(1.0)
                    .rate(0.05)
                    .volatility(0.2)
                    .n_samples(samples.len())
                    .build()
                    .unwrap()
            };
            let high = software_payoff_sum(&build(110.0), &samples);
            let low = software_payoff_sum(&build(90.0), &samples);
            proptest::prop_assert!(low.payoff_sum >= high.payoff_sum);
        }
    }

    #[test]
    fn test_sample_order_is_respected() {
        // Reversing the array changes the accumulation order but the sums
        // must still agree to tight tolerance.
        let params = reference_params(1000);
        let samples = SampleSource::from_seed(42).draw(1000);
        let mut reversed = samples.clone();
        reversed.reverse();

        let forward = software_payoff_sum(&params, &samples);
        let backward = software_payoff_sum(&params, &reversed);
        assert_relative_eq!(forward.payoff_sum, backward.payoff_sum, max_relative = 1e-9);
    }
}
