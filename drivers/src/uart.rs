/*++

Licensed under the Apache-2.0 license.

File Name:

    uart.rs

Abstract:

    File contains API for writing to a PL011 UART

--*/

use crate::memory_layout::UART_ORG;

const UARTDR: usize = 0x000;
const UARTFR: usize = 0x018;
const UARTFR_TXFF: u32 = 1 << 5;

/// PL011 UART
#[derive(Debug)]
pub struct Uart {
    base: usize,
}

impl Default for Uart {
    fn default() -> Self {
        Self::new(UART_ORG)
    }
}

impl Uart {
    /// Create an instance of the UART mapped at `base`
    pub const fn new(base: usize) -> Self {
        Self { base }
    }

    /// Write the string to UART
    ///
    /// # Arguments
    ///
    /// `str` - String to write to UART
    pub fn write(&mut self, str: &str) {
        for byte in str.bytes() {
            if byte == b'\n' {
                self.write_byte(b'\r');
            }
            match byte {
                0x20..=0x7e | b'\n' | b'\t' => self.write_byte(byte),
                _ => self.write_byte(b'?'),
            }
        }
    }

    /// Write the byte to UART
    ///
    /// # Arguments
    ///
    /// `byte` - Byte to write to UART
    pub fn write_byte(&mut self, byte: u8) {
        let fr = (self.base + UARTFR) as *const u32;
        let dr = (self.base + UARTDR) as *mut u32;
        unsafe {
            while core::ptr::read_volatile(fr) & UARTFR_TXFF != 0 {
                core::hint::spin_loop();
            }
            core::ptr::write_volatile(dr, byte as u32);
        }
    }
}
