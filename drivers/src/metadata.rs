/*++

Licensed under the Apache-2.0 license.

File Name:

    metadata.rs

Abstract:

    Per-image measurement metadata and the sentinel-terminated registries
    that map an image id to its recording destination.

--*/

use mboot_error::{MbootError, MbootResult};

/// Image id of the entry terminating a registry.
pub const MBOOT_INVALID_ID: u32 = u32::MAX;

/// Smallest signer id the RSE accepts.
pub const SIGNER_ID_MIN_SIZE: usize = 32;

/// Capacity of the signer id buffer.
pub const SIGNER_ID_MAX_SIZE: usize = 64;

/// Recording destination of one image for one sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageMeasurementMetadata {
    /// Platform image identifier
    pub image_id: u32,

    /// PCR index for the event log, measurement slot for the RSE
    pub destination_slot: u32,

    /// Minimum signer id size accepted for this image
    pub signer_id_min_size: usize,

    /// Human readable software type
    pub type_label: &'static str,

    /// Lock the destination slot after recording
    pub lock_after_record: bool,

    signer_id: [u8; SIGNER_ID_MAX_SIZE],
    signer_id_size: usize,
}

impl ImageMeasurementMetadata {
    /// Registry terminator.
    pub const SENTINEL: Self = Self::new(MBOOT_INVALID_ID, u32::MAX, "");

    /// Entry for the local event log; `pcr` is the PCR index recorded with the event.
    pub const fn new(image_id: u32, pcr: u32, type_label: &'static str) -> Self {
        Self {
            image_id,
            destination_slot: pcr,
            signer_id_min_size: 0,
            type_label,
            lock_after_record: false,
            signer_id: [0; SIGNER_ID_MAX_SIZE],
            signer_id_size: 0,
        }
    }

    /// Entry for the RSE.
    pub const fn rse(image_id: u32, slot: u32, type_label: &'static str) -> Self {
        Self {
            signer_id_min_size: SIGNER_ID_MIN_SIZE,
            ..Self::new(image_id, slot, type_label)
        }
    }

    pub const fn with_lock(self, lock_after_record: bool) -> Self {
        Self {
            lock_after_record,
            ..self
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.image_id == MBOOT_INVALID_ID
    }

    /// Signer id recorded by an earlier stage, empty if none was set.
    pub fn signer_id(&self) -> &[u8] {
        &self.signer_id[..self.signer_id_size]
    }

    /// Record the signer id of the image.
    ///
    /// # Arguments
    ///
    /// * `signer_id` - Hash of the key the image was signed with
    pub fn set_signer_id(&mut self, signer_id: &[u8]) -> MbootResult<()> {
        if signer_id.len() < self.signer_id_min_size || signer_id.len() > SIGNER_ID_MAX_SIZE {
            return Err(MbootError::DRIVER_MBOOT_INVALID_SIGNER_ID);
        }
        self.signer_id[..signer_id.len()].copy_from_slice(signer_id);
        self.signer_id[signer_id.len()..].fill(0);
        self.signer_id_size = signer_id.len();
        Ok(())
    }
}

/// Set the signer id of `image_id` in a mutable table before it is lent to a sink.
pub fn set_signer_id(
    table: &mut [ImageMeasurementMetadata],
    image_id: u32,
    signer_id: &[u8],
) -> MbootResult<()> {
    table
        .iter_mut()
        .take_while(|m| !m.is_sentinel())
        .find(|m| m.image_id == image_id)
        .ok_or(MbootError::DRIVER_MBOOT_UNKNOWN_IMAGE_ID)?
        .set_signer_id(signer_id)
}

/// Read-only view of a sentinel-terminated metadata table.
#[derive(Clone, Copy, Debug)]
pub struct MetadataRegistry<'a> {
    entries: &'a [ImageMeasurementMetadata],
}

impl<'a> MetadataRegistry<'a> {
    pub fn new(entries: &'a [ImageMeasurementMetadata]) -> Self {
        debug_assert!(
            entries.iter().any(|m| m.is_sentinel()),
            "metadata registry is missing its terminator"
        );
        Self { entries }
    }

    /// Find the metadata of `image_id`, scanning up to the terminator.
    pub fn lookup(&self, image_id: u32) -> Option<&'a ImageMeasurementMetadata> {
        if image_id == MBOOT_INVALID_ID {
            return None;
        }
        self.entries
            .iter()
            .take_while(|m| !m.is_sentinel())
            .find(|m| m.image_id == image_id)
    }

    /// Entries preceding the terminator.
    pub fn iter(&self) -> impl Iterator<Item = &'a ImageMeasurementMetadata> {
        self.entries.iter().take_while(|m| !m.is_sentinel())
    }
}
