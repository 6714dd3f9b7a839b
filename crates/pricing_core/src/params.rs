//! European call option parameters.
//!
//! This module provides the validated, immutable parameter set shared by
//! both pricing backends, plus a builder for constructing it.

use serde::Deserialize;

use crate::error::ParameterError;

/// Maximum sample count accepted.
///
/// The accelerator's sample-count register is a single 32-bit word, so
/// anything above `u32::MAX` cannot be programmed.
pub const MAX_SAMPLES: usize = u32::MAX as usize;

/// Parameters of a single European call pricing run.
///
/// Immutable for the duration of the run. Use [`OptionParams::builder`]
/// to construct instances; construction validates every field.
///
/// A sample count of zero is permitted and defines a degenerate run with
/// payoff sum and present value both zero.
///
/// # Examples
///
/// ```rust
/// use pricing_core::OptionParams;
///
/// let params = OptionParams::builder()
///     .spot(100.0)
///     .strike(105.0)
///     .maturity(1.0)
///     .rate(0.05)
///     .volatility(0.2)
///     .n_samples(1000)
///     .build()
///     .unwrap();
///
/// assert_eq!(params.n_samples(), 1000);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "RawParams")]
pub struct OptionParams {
    /// Initial stock price (S0).
    spot: f64,
    /// Strike price (K).
    strike: f64,
    /// Time to maturity in years (T).
    maturity: f64,
    /// Annualised risk-free rate (r).
    rate: f64,
    /// Annualised volatility (sigma).
    volatility: f64,
    /// Number of Monte Carlo samples (N).
    n_samples: usize,
}

impl OptionParams {
    /// Creates a new parameter builder.
    #[inline]
    pub fn builder() -> OptionParamsBuilder {
        OptionParamsBuilder::default()
    }

    /// Returns the initial stock price.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Returns the strike price.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Returns the time to maturity in years.
    #[inline]
    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    /// Returns the annualised risk-free rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the annualised volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Returns the number of Monte Carlo samples.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Drift term of the terminal-price recurrence: `(r - 0.5 sigma^2) T`.
    #[inline]
    pub fn drift(&self) -> f64 {
        (self.rate - 0.5 * self.volatility * self.volatility) * self.maturity
    }

    /// Diffusion scale of the terminal-price recurrence: `sigma sqrt(T)`.
    #[inline]
    pub fn vol_sqrt_t(&self) -> f64 {
        self.volatility * self.maturity.sqrt()
    }

    /// Present-value discount factor: `exp(-r T)`.
    #[inline]
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.maturity).exp()
    }

    fn validate(&self) -> Result<(), ParameterError> {
        check_finite("spot", self.spot)?;
        check_finite("strike", self.strike)?;
        check_finite("maturity", self.maturity)?;
        check_finite("rate", self.rate)?;
        check_finite("volatility", self.volatility)?;

        if self.spot <= 0.0 {
            return Err(ParameterError::OutOfRange {
                name: "spot",
                value: self.spot,
                constraint: "must be > 0",
            });
        }
        if self.strike <= 0.0 {
            return Err(ParameterError::OutOfRange {
                name: "strike",
                value: self.strike,
                constraint: "must be > 0",
            });
        }
        if self.maturity <= 0.0 {
            return Err(ParameterError::OutOfRange {
                name: "maturity",
                value: self.maturity,
                constraint: "must be > 0",
            });
        }
        if self.volatility < 0.0 {
            return Err(ParameterError::OutOfRange {
                name: "volatility",
                value: self.volatility,
                constraint: "must be >= 0",
            });
        }
        if self.n_samples > MAX_SAMPLES {
            return Err(ParameterError::OutOfRange {
                name: "n_samples",
                value: self.n_samples as f64,
                constraint: "must fit in a 32-bit register",
            });
        }
        Ok(())
    }
}

fn check_finite(name: &'static str, value: f64) -> Result<(), ParameterError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ParameterError::NonFinite { name, value })
    }
}

/// Builder for [`OptionParams`].
///
/// Every scalar field is required; `n_samples` defaults to zero (the
/// defined degenerate run) when unset.
#[derive(Clone, Debug, Default)]
pub struct OptionParamsBuilder {
    spot: Option<f64>,
    strike: Option<f64>,
    maturity: Option<f64>,
    rate: Option<f64>,
    volatility: Option<f64>,
    n_samples: usize,
}

impl OptionParamsBuilder {
    /// Sets the initial stock price.
    #[inline]
    pub fn spot(mut self, spot: f64) -> Self {
        self.spot = Some(spot);
        self
    }

    /// Sets the strike price.
    #[inline]
    pub fn strike(mut self, strike: f64) -> Self {
        self.strike = Some(strike);
        self
    }

    /// Sets the time to maturity in years.
    #[inline]
    pub fn maturity(mut self, maturity: f64) -> Self {
        self.maturity = Some(maturity);
        self
    }

    /// Sets the annualised risk-free rate.
    #[inline]
    pub fn rate(mut self, rate: f64) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Sets the annualised volatility.
    #[inline]
    pub fn volatility(mut self, volatility: f64) -> Self {
        self.volatility = Some(volatility);
        self
    }

    /// Sets the number of Monte Carlo samples.
    #[inline]
    pub fn n_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = n_samples;
        self
    }

    /// Builds and validates the parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError`] if a required field is missing, a scalar
    /// is non-finite, or a value is outside its valid range.
    pub fn build(self) -> Result<OptionParams, ParameterError> {
        let params = OptionParams {
            spot: self.spot.ok_or(ParameterError::Missing { name: "spot" })?,
            strike: self
                .strike
                .ok_or(ParameterError::Missing { name: "strike" })?,
            maturity: self
                .maturity
                .ok_or(ParameterError::Missing { name: "maturity" })?,
            rate: self.rate.ok_or(ParameterError::Missing { name: "rate" })?,
            volatility: self
                .volatility
                .ok_or(ParameterError::Missing { name: "volatility" })?,
            n_samples: self.n_samples,
        };
        params.validate()?;
        Ok(params)
    }
}

/// Unvalidated mirror of [`OptionParams`] for scenario-file deserialisation.
#[derive(Deserialize)]
struct RawParams {
    spot: f64,
    strike: f64,
    maturity: f64,
    rate: f64,
    volatility: f64,
    n_samples: usize,
}

impl TryFrom<RawParams> for OptionParams {
    type Error = ParameterError;

    fn try_from(raw: RawParams) -> Result<Self, Self::Error> {
        OptionParams::builder()
            .spot(raw.spot)
            .strike(raw.strike)
            .maturity(raw.maturity)
            .rate(raw.rate)
            .volatility(raw.volatility)
            .n_samples(raw.n_samples)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference_params() -> OptionParams {
        OptionParams::builder()
            .spot(100.0)
            .strike(105.0)
            .maturity(1.0)
            .rate(0.05)
            .volatility(0.2)
            .n_samples(1000)
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_valid() {
        let params = reference_params();
        assert_eq!(params.spot(), 100.0);
        assert_eq!(params.strike(), 105.0);
        assert_eq!(params.n_samples(), 1000);
    }

    #[test]
    fn test_derived_quantities() {
        let params = reference_params();
        // drift = (0.05 - 0.5 * 0.04) * 1.0 = 0.03
        assert_relative_eq!(params.drift(), 0.03, epsilon = 1e-12);
        assert_relative_eq!(params.vol_sqrt_t(), 0.2, epsilon = 1e-12);
        assert_relative_eq!(params.discount_factor(), (-0.05_f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_zero_samples_permitted() {
        let params = OptionParams::builder()
            .spot(100.0)
            .strike(105.0)
            .maturity(1.0)
            .rate(0.05)
            .volatility(0.2)
            .build()
            .unwrap();
        assert_eq!(params.n_samples(), 0);
    }

    #[test]
    fn test_missing_field() {
        let result = OptionParams::builder().spot(100.0).build();
        assert!(matches!(
            result,
            Err(ParameterError::Missing { name: "strike" })
        ));
    }

    #[test]
    fn test_invalid_spot() {
        let result = OptionParams::builder()
            .spot(-100.0)
            .strike(105.0)
            .maturity(1.0)
            .rate(0.05)
            .volatility(0.2)
            .build();
        assert!(matches!(
            result,
            Err(ParameterError::OutOfRange { name: "spot", .. })
        ));
    }

    #[test]
    fn test_invalid_maturity() {
        let result = OptionParams::builder()
            .spot(100.0)
            .strike(105.0)
            .maturity(0.0)
            .rate(0.05)
            .volatility(0.2)
            .build();
        assert!(matches!(
            result,
            Err(ParameterError::OutOfRange {
                name: "maturity",
                ..
            })
        ));
    }

    #[test]
    fn test_negative_volatility() {
        let result = OptionParams::builder()
            .spot(100.0)
            .strike(105.0)
            .maturity(1.0)
            .rate(0.05)
            .volatility(-0.1)
            .build();
        assert!(matches!(
            result,
            Err(ParameterError::OutOfRange {
                name: "volatility",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_volatility_permitted() {
        let result = OptionParams::builder()
            .spot(100.0)
            .strike(105.0)
            .maturity(1.0)
            .rate(0.05)
            .volatility(0.0)
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_non_finite_rate() {
        let result = OptionParams::builder()
            .spot(100.0)
            .strike(105.0)
            .maturity(1.0)
            .rate(f64::NAN)
            .volatility(0.2)
            .build();
        assert!(matches!(
            result,
            Err(ParameterError::NonFinite { name: "rate", .. })
        ));
    }

    #[test]
    fn test_scenario_deserialisation_validates() {
        let toml = r#"
            spot = 100.0
            strike = 105.0
            maturity = -1.0
            rate = 0.05
            volatility = 0.2
            n_samples = 1000
        "#;
        let result: Result<OptionParams, _> = toml::from_str(toml);
        assert!(result.is_err());
    }
}
