// Licensed under the Apache-2.0 license.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod boot_status;
pub mod mboot;
pub mod measure;

pub use boot_status::MbootState;
pub use mboot::{EventLogSink, MeasuredBoot};
pub use measure::measure_and_record_all;

pub use mboot_drivers::cprint;
pub use mboot_drivers::cprintln;
pub use mboot_drivers::printer::HexBytes;
pub use mboot_drivers::printer::Printer;
