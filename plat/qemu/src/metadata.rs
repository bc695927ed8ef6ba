/*++

Licensed under the Apache-2.0 license.

File Name:

    metadata.rs

Abstract:

    Measurement metadata tables of the QEMU boot stages.

--*/

use crate::image_ids::*;
use crate::memory_layout::PCR_0;
use mboot_drivers::ImageMeasurementMetadata;

/// Images BL2 records in its event log.
pub const BL2_EVENT_LOG_METADATA: [ImageMeasurementMetadata; 11] = [
    ImageMeasurementMetadata::new(BL31_IMAGE_ID, PCR_0, MBOOT_BL31_IMAGE_STRING),
    ImageMeasurementMetadata::new(BL32_IMAGE_ID, PCR_0, MBOOT_BL32_IMAGE_STRING),
    ImageMeasurementMetadata::new(BL32_EXTRA1_IMAGE_ID, PCR_0, MBOOT_BL32_EXTRA1_IMAGE_STRING),
    ImageMeasurementMetadata::new(BL32_EXTRA2_IMAGE_ID, PCR_0, MBOOT_BL32_EXTRA2_IMAGE_STRING),
    ImageMeasurementMetadata::new(BL33_IMAGE_ID, PCR_0, MBOOT_BL33_IMAGE_STRING),
    ImageMeasurementMetadata::new(HW_CONFIG_ID, PCR_0, MBOOT_HW_CONFIG_STRING),
    ImageMeasurementMetadata::new(NT_FW_CONFIG_ID, PCR_0, MBOOT_NT_FW_CONFIG_STRING),
    ImageMeasurementMetadata::new(SCP_BL2_IMAGE_ID, PCR_0, MBOOT_SCP_BL2_IMAGE_STRING),
    ImageMeasurementMetadata::new(SOC_FW_CONFIG_ID, PCR_0, MBOOT_SOC_FW_CONFIG_STRING),
    ImageMeasurementMetadata::new(TOS_FW_CONFIG_ID, PCR_0, MBOOT_TOS_FW_CONFIG_STRING),
    ImageMeasurementMetadata::SENTINEL,
];

#[cfg(feature = "rme")]
const BL2_RSE_ENTRIES: usize = 5;
#[cfg(not(feature = "rme"))]
const BL2_RSE_ENTRIES: usize = 4;

/// Images BL2 forwards to the RSE.
pub const BL2_RSE_METADATA: [ImageMeasurementMetadata; BL2_RSE_ENTRIES] = [
    ImageMeasurementMetadata::rse(BL31_IMAGE_ID, 11, MBOOT_BL31_IMAGE_STRING),
    ImageMeasurementMetadata::rse(HW_CONFIG_ID, 12, MBOOT_HW_CONFIG_STRING),
    ImageMeasurementMetadata::rse(SOC_FW_CONFIG_ID, 13, MBOOT_SOC_FW_CONFIG_STRING),
    #[cfg(feature = "rme")]
    ImageMeasurementMetadata::rse(RMM_IMAGE_ID, 14, MBOOT_RMM_IMAGE_STRING),
    ImageMeasurementMetadata::SENTINEL,
];

/// Images BL1 forwards to the RSE.
pub const BL1_RSE_METADATA: [ImageMeasurementMetadata; 4] = [
    ImageMeasurementMetadata::rse(FW_CONFIG_ID, 8, MBOOT_FW_CONFIG_STRING),
    ImageMeasurementMetadata::rse(TB_FW_CONFIG_ID, 9, MBOOT_TB_FW_CONFIG_STRING),
    ImageMeasurementMetadata::rse(BL2_IMAGE_ID, 10, MBOOT_BL2_IMAGE_STRING),
    ImageMeasurementMetadata::SENTINEL,
];

/// BL2 metadata tables. The RSE table is writable so that signer ids
/// learned while authenticating images can be filled in before measuring.
#[derive(Clone, Copy, Debug)]
pub struct Bl2Metadata {
    pub event_log: [ImageMeasurementMetadata; 11],
    pub rse: [ImageMeasurementMetadata; BL2_RSE_ENTRIES],
}

impl Default for Bl2Metadata {
    fn default() -> Self {
        Self {
            event_log: BL2_EVENT_LOG_METADATA,
            rse: BL2_RSE_METADATA,
        }
    }
}

/// BL1 metadata tables.
#[derive(Clone, Copy, Debug)]
pub struct Bl1Metadata {
    pub rse: [ImageMeasurementMetadata; 4],
}

impl Default for Bl1Metadata {
    fn default() -> Self {
        Self {
            rse: BL1_RSE_METADATA,
        }
    }
}
