// Licensed under the Apache-2.0 license

/// Data cache maintenance for memory read by agents outside the current
/// coherency domain.
pub trait CacheMaintenance {
    /// Clean and invalidate the data cache lines covering `[addr, addr + size)`.
    fn flush_dcache_range(&mut self, addr: u64, size: usize);
}
