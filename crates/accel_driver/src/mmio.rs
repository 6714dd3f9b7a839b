//! Register bus abstraction and volatile MMIO access.
//!
//! [`RegisterBus`] is the seam between the controller and a concrete
//! device: real hardware is reached through [`MappedRegisters`] over a
//! memory-mapped window, and tests/hardware-free runs use
//! [`SimulatedKernel`](crate::sim::SimulatedKernel).

/// 32-bit register access to the kernel's control window.
///
/// Reads must be volatile with respect to the device (status bits change
/// underneath the CPU); writes may trigger hardware side effects.
pub trait RegisterBus {
    /// Reads the 32-bit register at `offset` bytes into the window.
    fn read32(&self, offset: usize) -> u32;

    /// Writes the 32-bit register at `offset` bytes into the window.
    fn write32(&mut self, offset: usize, value: u32);
}

/// Volatile MMIO access over an already-mapped register window.
///
/// Mapping the window (UIO, `/dev/mem`, or a vendor runtime) is the
/// platform's concern; this type only performs the bounds-checked
/// volatile accesses against it.
pub struct MappedRegisters {
    ptr: *mut u8,
    len: usize,
}

impl std::fmt::Debug for MappedRegisters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedRegisters")
            .field("ptr", &format_args!("{:p}", self.ptr))
            .field("len", &self.len)
            .finish()
    }
}

// SAFETY: Send - MappedRegisters owns its window exclusively; the mapping
// is process-wide and carries no thread-local state.
unsafe impl Send for MappedRegisters {}

impl MappedRegisters {
    /// Wraps a mapped register window.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a live, 4-byte-aligned mapping of at least
    /// `len` bytes of device registers, valid for volatile reads and
    /// writes for the lifetime of the returned value, and not aliased by
    /// any other accessor.
    pub unsafe fn from_raw_parts(ptr: *mut u8, len: usize) -> Self {
        Self { ptr, len }
    }

    /// Returns the window size in bytes.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the window is empty.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl RegisterBus for MappedRegisters {
    /// Reads a 32-bit register.
    ///
    /// # Panics
    ///
    /// Panics if `offset + 4` exceeds the window size.
    fn read32(&self, offset: usize) -> u32 {
        assert!(offset + 4 <= self.len, "Register offset out of bounds");
        // SAFETY: volatile read required for MMIO - the device changes
        // status bits underneath the CPU. ptr is valid for self.len bytes
        // per from_raw_parts, offset+4 <= len, registers are 4-aligned.
        unsafe { std::ptr::read_volatile(self.ptr.add(offset).cast::<u32>()) }
    }

    /// Writes a 32-bit register.
    ///
    /// # Panics
    ///
    /// Panics if `offset + 4` exceeds the window size.
    fn write32(&mut self, offset: usize, value: u32) {
        assert!(offset + 4 <= self.len, "Register offset out of bounds");
        // SAFETY: volatile write required for MMIO - writes trigger
        // hardware side effects. Same bounds/alignment invariants as read32.
        unsafe {
            std::ptr::write_volatile(self.ptr.add(offset).cast::<u32>(), value);
        }
    }
}
