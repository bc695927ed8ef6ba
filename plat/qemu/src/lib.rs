/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the QEMU measured boot platform port.

--*/

#![cfg_attr(not(feature = "std"), no_std)]

mod bl1;
mod bl2;

pub mod image_ids;
pub mod memory_layout;
pub mod metadata;

pub use bl1::{bl1_mboot, Bl1Env};
pub use bl2::{bl2_mboot, Bl2Env};
pub use memory_layout::PLAT_EVENT_LOG_MAX_SIZE;
pub use metadata::{Bl1Metadata, Bl2Metadata};

use mboot_common::MeasuredBoot;
use mboot_drivers::ImageInfo;
use mboot_error::MbootResult;

/// Measure an image loaded by the current boot stage.
///
/// # Arguments
///
/// * `mboot` - Measured boot pipeline of the stage
/// * `image_id` - Image identifier, see `image_ids`
/// * `image` - Loaded image
pub fn plat_mboot_measure_image(
    mboot: &mut MeasuredBoot,
    image_id: u32,
    image: &ImageInfo,
) -> MbootResult<()> {
    mboot.measure(image_id, image)
}

/// Measure a public key. QEMU does not record keys.
pub fn plat_mboot_measure_key(
    mboot: &mut MeasuredBoot,
    key_oid: &[u8],
    key: &[u8],
) -> MbootResult<()> {
    mboot.measure_key(key_oid, key)
}
