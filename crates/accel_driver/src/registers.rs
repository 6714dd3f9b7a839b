//! The register file contents for one kernel run, as a value.
//!
//! The source of truth for a run's configuration is this explicit
//! [`RegisterImage`] rather than a live, name-indexed binding to the
//! device: the image is built atomically from validated parameters, can
//! be inspected and tested without hardware, and is written to the bus
//! in a single pass.

use pricing_core::OptionParams;

use crate::encode::{encode_param, split_address, EncodeError};
use crate::mmio::RegisterBus;
use crate::regs;

/// Contents of every argument register for one kernel run.
///
/// One named 32-bit field per register slot. Address fields hold the
/// low/high halves produced by [`split_address`]; scalar fields hold raw
/// IEEE-754 bit patterns except `sample_count`, which is a plain
/// unsigned integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegisterImage {
    /// Input sample buffer address, low half.
    pub input_addr_lo: u32,
    /// Input sample buffer address, high half.
    pub input_addr_hi: u32,
    /// Output accumulator address, low half.
    pub output_addr_lo: u32,
    /// Output accumulator address, high half.
    pub output_addr_hi: u32,
    /// Sample count N.
    pub sample_count: u32,
    /// S0 bit pattern.
    pub spot: u32,
    /// K bit pattern.
    pub strike: u32,
    /// T bit pattern.
    pub maturity: u32,
    /// r bit pattern.
    pub rate: u32,
    /// sigma bit pattern.
    pub volatility: u32,
}

impl RegisterImage {
    /// Builds the full register image for one run.
    ///
    /// Addresses are split low-word-first; every scalar is validated and
    /// bit-encoded before anything is written to hardware, so a bad
    /// parameter can never leave the register file half-programmed.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] if any scalar is non-finite or overflows
    /// the device's f32 format.
    pub fn for_run(
        params: &OptionParams,
        input_addr: u64,
        output_addr: u64,
    ) -> Result<Self, EncodeError> {
        let (input_addr_lo, input_addr_hi) = split_address(input_addr);
        let (output_addr_lo, output_addr_hi) = split_address(output_addr);

        Ok(Self {
            input_addr_lo,
            input_addr_hi,
            output_addr_lo,
            output_addr_hi,
            sample_count: params.n_samples() as u32,
            spot: encode_param(params.spot())?,
            strike: encode_param(params.strike())?,
            maturity: encode_param(params.maturity())?,
            rate: encode_param(params.rate())?,
            volatility: encode_param(params.volatility())?,
        })
    }

    /// Writes every argument register to the bus in one pass.
    ///
    /// Does not touch the control register; starting the kernel is the
    /// controller's transition, not part of programming.
    pub fn write_to<B: RegisterBus>(&self, bus: &mut B) {
        bus.write32(regs::INPUT_ADDR_LO, self.input_addr_lo);
        bus.write32(regs::INPUT_ADDR_HI, self.input_addr_hi);
        bus.write32(regs::OUTPUT_ADDR_LO, self.output_addr_lo);
        bus.write32(regs::OUTPUT_ADDR_HI, self.output_addr_hi);
        bus.write32(regs::SAMPLE_COUNT, self.sample_count);
        bus.write32(regs::SPOT, self.spot);
        bus.write32(regs::STRIKE, self.strike);
        bus.write32(regs::MATURITY, self.maturity);
        bus.write32(regs::RATE, self.rate);
        bus.write32(regs::SIGMA, self.volatility);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{decode_f32, join_address};

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
    fn test_addresses_split_low_first() {
        let image =
            RegisterImage::for_run(&reference_params(), 0xAAAA_BBBB_CCCC_DDDD, 0x1111_2222_3333_4444)
                .unwrap();

        assert_eq!(image.input_addr_lo, 0xCCCC_DDDD);
        assert_eq!(image.input_addr_hi, 0xAAAA_BBBB);
        assert_eq!(
            join_address(image.output_addr_lo, image.output_addr_hi),
            0x1111_2222_3333_4444
        );
    }

    #[test]
    fn test_scalars_bit_encoded() {
        let image = RegisterImage::for_run(&reference_params(), 0x1000, 0x2000).unwrap();

        assert_eq!(decode_f32(image.spot), 100.0f32);
        assert_eq!(decode_f32(image.strike), 105.0f32);
        assert_eq!(decode_f32(image.maturity), 1.0f32);
        assert_eq!(decode_f32(image.rate), 0.05f32);
        assert_eq!(decode_f32(image.volatility), 0.2f32);
        assert_eq!(image.sample_count, 1000);
    }

    #[test]
    fn test_write_to_hits_every_argument_register() {
        struct RecordingBus {
            written: Vec<(usize, u32)>,
        }
        impl RegisterBus for RecordingBus {
            fn read32(&self, _offset: usize) -> u32 {
                0
            }
            fn write32(&mut self, offset: usize, value: u32) {
                self.written.push((offset, value));
            }
        }

        let image = RegisterImage::for_run(&reference_params(), 0x1000, 0x2000).unwrap();
        let mut bus = RecordingBus {
            written: Vec::new(),
        };
        image.write_to(&mut bus);

        let offsets: Vec<usize> = bus.written.iter().map(|&(o, _)| o).collect();
        for expected in [
            regs::INPUT_ADDR_LO,
            regs::INPUT_ADDR_HI,
            regs::OUTPUT_ADDR_LO,
            regs::OUTPUT_ADDR_HI,
            regs::SAMPLE_COUNT,
            regs::SPOT,
            regs::STRIKE,
            regs::MATURITY,
            regs::RATE,
            regs::SIGMA,
        ] {
            assert!(offsets.contains(&expected), "missing offset {expected:#x}");
        }
        // Programming never touches CTRL.
        assert!(!offsets.contains(&regs::CTRL));
    }
}
