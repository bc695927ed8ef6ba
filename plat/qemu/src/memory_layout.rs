/*++
Licensed under the Apache-2.0 license.

File Name:

    memory_layout.rs

Abstract:

    Memory sizes of the QEMU measured boot port.

--*/

//
// Memory Sizes In Bytes
//
pub const PLAT_EVENT_LOG_MAX_SIZE: usize = 0x400;

//
// PCR indices
//
pub const PCR_0: u32 = 0;
