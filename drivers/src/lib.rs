/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the measured boot driver library.

--*/

#![cfg_attr(not(feature = "std"), no_std)]

mod cache;
mod digest;
mod error_reporter;
mod image;

pub mod event_log;
pub mod hand_off;
pub mod memory_layout;
pub mod metadata;
pub mod printer;
pub mod rse;

pub use cache::CacheMaintenance;
pub use digest::{DigestService, DigestValue, Sha256Sw, DIGEST_SIZE, TPM_ALG_SHA256};
pub use error_reporter::{report_error_non_fatal, report_fatal_error_and_halt};
pub use event_log::{dump_event_log, EventLog, EventLogEntry, EventLogIter, EventLogRecord};
pub use hand_off::{ConfigChannel, HandoffDescriptor};
pub use image::ImageInfo;
pub use mboot_error::{MbootError, MbootResult};
pub use metadata::{
    set_signer_id, ImageMeasurementMetadata, MetadataRegistry, MBOOT_INVALID_ID,
    SIGNER_ID_MAX_SIZE, SIGNER_ID_MIN_SIZE,
};
pub use rse::{RseComms, RseMeasurement, RseSession};

cfg_if::cfg_if! {
    if #[cfg(feature = "pl011")] {
        mod uart;

        pub use uart::Uart;
    }
}
