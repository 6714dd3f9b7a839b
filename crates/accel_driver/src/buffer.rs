//! CPU/device-shared buffers with explicit cache maintenance.
//!
//! A [`DeviceBuffer`] is a region the coprocessor reads or writes via
//! its device-visible address while the host owns the CPU view. Its
//! lifecycle is fixed: allocate → write (CPU) → flush → device runs →
//! invalidate → read. Device-side writes are not guaranteed visible to
//! the CPU cache, so the *only* read path is
//! [`DeviceBuffer::sync_read`], which performs the invalidate first —
//! there is deliberately no raw read accessor to skip it with.
//!
//! The controller never sees a buffer, only its address value; ownership
//! stays with the allocating side for the buffer's whole lifetime.

use std::sync::atomic::{fence, Ordering};

use tracing::debug;

use crate::error::DriverError;

/// Allocator for device-shared `f32` regions.
///
/// On a coherent platform (and in hardware-free runs against the
/// simulated kernel) ordinary host memory satisfies the contract: the
/// address handed to the device is the buffer's stable location for its
/// whole lifetime. Platforms with dedicated CMA pools slot in here.
#[derive(Debug, Default)]
pub struct DeviceBufferManager {
    allocated: usize,
}

impl DeviceBufferManager {
    /// Creates a new manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total bytes currently allocated through this manager.
    pub fn allocated_bytes(&self) -> usize {
        self.allocated
    }

    /// Allocates a zero-initialised device-shared region of `len` `f32`s.
    ///
    /// # Errors
    ///
    /// [`DriverError::Allocation`] if the platform cannot provide the
    /// region.
    pub fn allocate(&mut self, len: usize) -> Result<DeviceBuffer, DriverError> {
        let bytes = len * std::mem::size_of::<f32>();
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(len)
            .map_err(|_| DriverError::Allocation { bytes })?;
        storage.resize(len, 0.0f32);

        self.allocated += bytes;
        let buffer = DeviceBuffer {
            storage: storage.into_boxed_slice(),
            cpu_view_valid: true,
        };
        debug!(
            "allocated device-shared buffer: {} elements at {:#x}",
            len,
            buffer.device_address()
        );
        Ok(buffer)
    }

    /// Allocates with a single retry, then fails closed.
    ///
    /// A transient shortage (fragmented pool) gets one more chance; a
    /// genuine shortage surfaces as [`DriverError::Allocation`].
    pub fn allocate_with_retry(&mut self, len: usize) -> Result<DeviceBuffer, DriverError> {
        match self.allocate(len) {
            Ok(buffer) => Ok(buffer),
            Err(first) => {
                debug!(%first, "allocation failed, retrying once");
                self.allocate(len)
            }
        }
    }
}

/// An exclusively-owned CPU/device-shared region of `f32` values.
pub struct DeviceBuffer {
    storage: Box<[f32]>,
    cpu_view_valid: bool,
}

impl DeviceBuffer {
    /// Number of elements in the region.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns true if the region is empty.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// The stable address the device must be programmed with.
    ///
    /// Constant for the buffer's lifetime; handed to the controller only
    /// as this value, never as an aliased handle.
    pub fn device_address(&self) -> u64 {
        self.storage.as_ptr() as u64
    }

    /// Copies host data into the region.
    ///
    /// # Errors
    ///
    /// [`DriverError::TransferSize`] if `data` does not match the
    /// region's length exactly.
    pub fn write(&mut self, data: &[f32]) -> Result<(), DriverError> {
        if data.len() != self.storage.len() {
            return Err(DriverError::TransferSize {
                expected: self.storage.len(),
                actual: data.len(),
            });
        }
        self.storage.copy_from_slice(data);
        self.cpu_view_valid = true;
        Ok(())
    }

    /// Makes CPU writes visible to the device.
    ///
    /// Must be called after the last host write and before start-assert.
    /// Once flushed, the device owns the region until completion; the
    /// CPU view is stale until [`sync_read`](Self::sync_read).
    pub fn flush(&mut self) {
        fence(Ordering::SeqCst);
        self.cpu_view_valid = false;
        debug!("flushed buffer at {:#x} to device", self.device_address());
    }

    /// Invalidates the CPU view and returns the region's contents.
    ///
    /// This is the only read path: the invalidate cannot be skipped, so
    /// a device-side write can never be shadowed by a stale cached copy.
    /// Call only after the device has signalled completion — contents
    /// between start-assert and done-detect are undefined.
    pub fn sync_read(&mut self) -> &[f32] {
        if !self.cpu_view_valid {
            fence(Ordering::SeqCst);
            self.cpu_view_valid = true;
            debug!("invalidated CPU view of buffer at {:#x}", self.device_address());
        }
        &self.storage
    }
}

impl std::fmt::Debug for DeviceBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceBuffer")
            .field("len", &self.storage.len())
            .field("device_address", &format_args!("{:#x}", self.device_address()))
            .field("cpu_view_valid", &self.cpu_view_valid)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_zero_initialised() {
        let mut manager = DeviceBufferManager::new();
        let mut buffer = manager.allocate(16).unwrap();
        assert_eq!(buffer.len(), 16);
        assert!(buffer.sync_read().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_device_address_stable() {
        let mut manager = DeviceBufferManager::new();
        let mut buffer = manager.allocate(1024).unwrap();
        let before = buffer.device_address();
        buffer.write(&vec![1.0; 1024]).unwrap();
        buffer.flush();
        let _ = buffer.sync_read();
        assert_eq!(buffer.device_address(), before);
        assert_ne!(before, 0);
    }

    #[test]
    fn test_write_length_mismatch() {
        let mut manager = DeviceBufferManager::new();
        let mut buffer = manager.allocate(8).unwrap();
        let result = buffer.write(&[1.0; 4]);
        assert!(matches!(
            result,
            Err(DriverError::TransferSize {
                expected: 8,
                actual: 4
            })
        ));
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let mut manager = DeviceBufferManager::new();
        let mut buffer = manager.allocate(4).unwrap();
        buffer.write(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        buffer.flush();
        assert_eq!(buffer.sync_read(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_empty_buffer_permitted() {
        // N = 0 runs still allocate the (empty) input region.
        let mut manager = DeviceBufferManager::new();
        let mut buffer = manager.allocate(0).unwrap();
        assert!(buffer.is_empty());
        assert!(buffer.sync_read().is_empty());
    }

    #[test]
    fn test_allocated_bytes_accounting() {
        let mut manager = DeviceBufferManager::new();
        let _a = manager.allocate(1000).unwrap();
        let _b = manager.allocate(1).unwrap();
        assert_eq!(manager.allocated_bytes(), 1000 * 4 + 4);
    }

    #[test]
    fn test_allocate_with_retry_success_path() {
        let mut manager = DeviceBufferManager::new();
        assert!(manager.allocate_with_retry(64).is_ok());
    }
}
