/*++

Licensed under the Apache-2.0 license.

File Name:

    error_reporter.rs

Abstract:

    File contains API for reporting measured boot errors on the boot console.

--*/
use crate::cprintln;
use mboot_error::MbootError;

/// Report non fatal F/W error
///
/// # Arguments
///
/// * `func` - Name of the reporting routine
/// * `err` - F/W error code.
pub fn report_error_non_fatal(func: &str, err: MbootError) {
    cprintln!("[mboot] {}(): error {}", func, err);
}

/// Report fatal F/W error and halt the boot
///
/// # Arguments
///
/// * `func` - Name of the reporting routine
/// * `err` - F/W error code.
///
/// # Returns
///
/// This function does not return
#[inline(never)]
pub fn report_fatal_error_and_halt(func: &str, err: MbootError) -> ! {
    cprintln!("[mboot] {}(): fatal error {}", func, err);

    #[cfg(feature = "std")]
    panic!("measured boot halted: 0x{:08X}", u32::from(err));

    #[cfg(not(feature = "std"))]
    loop {
        core::hint::spin_loop();
    }
}
