/*++

Licensed under the Apache-2.0 license.

File Name:

    boot_status.rs

Abstract:

    Measured boot stage states.

--*/

use core::convert::From;

const MBOOT_STATE_BASE: u32 = 0x800;

/// Lifecycle of the measured boot pipeline within one boot stage.
#[repr(u32)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MbootState {
    Uninitialized = MBOOT_STATE_BASE,
    Initialized = MBOOT_STATE_BASE + 1,
    Measuring = MBOOT_STATE_BASE + 2,
    Finalized = MBOOT_STATE_BASE + 3,
}

impl MbootState {
    /// Whether images can still be measured.
    pub fn accepts_measurements(&self) -> bool {
        matches!(self, MbootState::Initialized | MbootState::Measuring)
    }
}

impl From<MbootState> for u32 {
    /// Converts to this type from the input type.
    fn from(state: MbootState) -> u32 {
        state as u32
    }
}
