//! AXI-Lite register map of the Monte Carlo kernel.
//!
//! Fixed layout: the block control register at 0x00 followed by the
//! argument registers. Each 64-bit buffer address occupies two
//! consecutive 32-bit registers, low word first; scalar parameters are
//! single words holding raw IEEE-754 bit patterns, except the sample
//! count which is a plain unsigned integer.

/// Block control register: START/DONE/IDLE handshake bits.
pub const CTRL: usize = 0x00;

/// Input sample buffer address (low 32 bits).
pub const INPUT_ADDR_LO: usize = 0x10;
/// Input sample buffer address (high 32 bits).
pub const INPUT_ADDR_HI: usize = 0x14;
/// Output accumulator address (low 32 bits).
pub const OUTPUT_ADDR_LO: usize = 0x1C;
/// Output accumulator address (high 32 bits).
pub const OUTPUT_ADDR_HI: usize = 0x20;
/// Sample count N — plain unsigned integer.
pub const SAMPLE_COUNT: usize = 0x28;
/// Initial stock price S0 — f32 bit pattern.
pub const SPOT: usize = 0x30;
/// Strike price K — f32 bit pattern.
pub const STRIKE: usize = 0x38;
/// Time to maturity T — f32 bit pattern.
pub const MATURITY: usize = 0x40;
/// Risk-free rate r — f32 bit pattern.
pub const RATE: usize = 0x48;
/// Volatility sigma — f32 bit pattern.
pub const SIGMA: usize = 0x50;

/// Size of the register window in bytes.
pub const MAP_SIZE: usize = 0x58;

/// Control register bit definitions.
pub mod ctrl {
    /// Write 1 to begin kernel execution. Self-clearing.
    pub const AP_START: u32 = 1 << 0;
    /// Read-only; 1 once the kernel has finished.
    pub const AP_DONE: u32 = 1 << 1;
    /// Read-only; 1 while the kernel is quiescent.
    pub const AP_IDLE: u32 = 1 << 2;
}
