/*++
Licensed under the Apache-2.0 license.

File Name:

    memory_layout.rs

Abstract:

    The file contains the layout of memory. The constants defined
    in this file define the memory layout.

--*/

//
// Memory Addresses
//
pub const UART_ORG: usize = 0x0900_0000;
