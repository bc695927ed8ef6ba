/*++

Licensed under the Apache-2.0 license.

File Name:

    hand_off.rs

Abstract:

    File contains the descriptor published to later boot stages to locate
    the event log, and the channels it is published through.

--*/

use crate::cprintln;
use crate::printer::HexAddr;
use mboot_error::MbootResult;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Location of the event log handed to later stages. The receiver reads the
/// log in place and never frees it.
#[repr(C)]
#[derive(IntoBytes, FromBytes, KnownLayout, Immutable, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HandoffDescriptor {
    /// Address of the first byte of the log
    pub log_base_address: u64,

    /// Filled size of the log in bytes
    pub log_size: u64,
}

impl HandoffDescriptor {
    pub fn new(log_base_address: u64, log_size: usize) -> Self {
        Self {
            log_base_address,
            log_size: log_size as u64,
        }
    }
}

/// Downstream configuration slot receiving the descriptor, e.g. a node of
/// the NT_FW_CONFIG or TOS_FW_CONFIG device tree.
pub trait ConfigChannel {
    /// Name of the configuration slot, used in console messages.
    fn name(&self) -> &'static str;

    /// Store `descriptor` into the configuration slot.
    fn publish(&mut self, descriptor: &HandoffDescriptor) -> MbootResult<()>;
}

pub fn dump_handoff_descriptor(name: &str, descriptor: &HandoffDescriptor) {
    cprintln!(
        "[mboot] {} event log: base {} size {}",
        name,
        HexAddr(descriptor.log_base_address),
        descriptor.log_size
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem;

    #[test]
    fn test_descriptor_layout() {
        assert_eq!(mem::size_of::<HandoffDescriptor>(), 16);

        let descriptor = HandoffDescriptor::new(0x4010_0000, 0x1a2);
        let bytes = descriptor.as_bytes();
        assert_eq!(&bytes[..8], &0x4010_0000u64.to_ne_bytes());
        assert_eq!(&bytes[8..], &0x1a2u64.to_ne_bytes());
        assert_eq!(HandoffDescriptor::read_from_bytes(bytes).ok(), Some(descriptor));
    }
}
