//! Bit-level parameter encoding for the register file.
//!
//! The coprocessor's argument registers are plain 32-bit unsigned words.
//! Floating-point parameters therefore cross the boundary as raw
//! IEEE-754 bit patterns — a *reinterpretation*, never a value-preserving
//! integer cast (conflating the two silently corrupts every parameter).
//! 64-bit buffer addresses are split into two consecutive words, low
//! half first.

use thiserror::Error;

/// Errors raised while encoding scalars for the register file.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// Value is NaN or infinite and must not reach the device.
    #[error("Cannot encode non-finite parameter {value}")]
    NonFinite {
        /// Offending value.
        value: f64,
    },

    /// Finite value overflows the device's 32-bit float format.
    #[error("Parameter {value} overflows the device's f32 range")]
    Unrepresentable {
        /// Offending value.
        value: f64,
    },
}

/// Splits a 64-bit address into `(low, high)` 32-bit register halves.
///
/// The low word is written to the first of the paired address registers.
/// [`join_address`] is the exact inverse for every `u64`.
#[inline]
pub const fn split_address(addr: u64) -> (u32, u32) {
    (addr as u32, (addr >> 32) as u32)
}

/// Recombines the `(low, high)` register halves into the 64-bit address.
#[inline]
pub const fn join_address(low: u32, high: u32) -> u64 {
    ((high as u64) << 32) | low as u64
}

/// Reinterprets an `f32` as its IEEE-754 bit pattern.
///
/// This is the device's expected wire format for floating parameters.
/// [`decode_f32`] is the exact inverse for every bit pattern, including
/// ±0.0, subnormals, and NaN payloads.
#[inline]
pub const fn encode_f32(value: f32) -> u32 {
    value.to_bits()
}

/// Reinterprets a 32-bit word as the `f32` it encodes.
#[inline]
pub const fn decode_f32(bits: u32) -> f32 {
    f32::from_bits(bits)
}

/// Validates and encodes a domain scalar for an argument register.
///
/// Domain parameters are carried as `f64` host-side; the device register
/// holds the `f32` narrowing. Non-finite values are rejected before they
/// reach the register file, as are finite values that overflow the `f32`
/// range (the narrowing itself may round — that is the device's declared
/// precision, not an error).
///
/// # Errors
///
/// [`EncodeError::NonFinite`] for NaN/infinite input,
/// [`EncodeError::Unrepresentable`] if the `f32` narrowing overflows.
pub fn encode_param(value: f64) -> Result<u32, EncodeError> {
    if !value.is_finite() {
        return Err(EncodeError::NonFinite { value });
    }
    let narrowed = value as f32;
    if !narrowed.is_finite() {
        return Err(EncodeError::Unrepresentable { value });
    }
    Ok(encode_f32(narrowed))
}
