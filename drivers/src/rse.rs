/*++

Licensed under the Apache-2.0 license.

File Name:

    rse.rs

Abstract:

    File contains the client forwarding image measurements to the Runtime
    Security Engine (RSE). The transport carrying the requests is provided
    by the platform through `RseComms`.

--*/

use crate::digest::{DigestService, DigestValue};
use crate::metadata::MetadataRegistry;
use crate::{cprintln, ImageInfo};
use mboot_error::{MbootError, MbootResult};

/// Measurement algorithm identifier sent with every request (PSA_ALG_SHA_256).
pub const RSE_MBOOT_ALG_SHA256: u32 = 0x0200_0009;

/// Extend-measurement request sent to the RSE.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RseMeasurement<'a> {
    /// Measurement slot
    pub slot: u32,

    /// Hash of the key the image was signed with
    pub signer_id: &'a [u8],

    /// Image version
    pub version: &'a [u8],

    /// Measurement algorithm
    pub measurement_algo: u32,

    /// Software type
    pub sw_type: &'a str,

    /// Image digest
    pub measurement_value: &'a DigestValue,

    /// Lock the slot once extended
    pub lock_measurement: bool,
}

/// Communication channel to the RSE.
pub trait RseComms {
    /// Establish the channel.
    fn init(&mut self) -> MbootResult<()>;

    /// Send an extend-measurement request and wait for its completion.
    fn extend_measurement(&mut self, measurement: &RseMeasurement) -> MbootResult<()>;
}

/// Measured boot session with the RSE for one boot stage.
pub struct RseSession<'a> {
    comms: &'a mut dyn RseComms,
    registry: MetadataRegistry<'a>,
    available: bool,
}

impl<'a> RseSession<'a> {
    pub fn new(comms: &'a mut dyn RseComms, registry: MetadataRegistry<'a>) -> Self {
        Self {
            comms,
            registry,
            available: false,
        }
    }

    /// Establish the channel to the RSE.
    ///
    /// # Returns
    ///
    /// * `()` - Ok
    ///   `DRIVER_RSE_CHANNEL_INIT` if the RSE cannot be reached
    pub fn init(&mut self) -> MbootResult<()> {
        self.available = false;
        self.comms
            .init()
            .map_err(|_| MbootError::DRIVER_RSE_CHANNEL_INIT)?;
        self.available = true;
        Ok(())
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn registry(&self) -> MetadataRegistry<'a> {
        self.registry
    }

    /// Measure `image` and forward the measurement if `image_id` is tracked by the RSE.
    ///
    /// Images missing from the RSE registry are deliberately local-only and
    /// are not an error.
    ///
    /// # Returns
    ///
    /// * `()` - Ok
    ///   `DRIVER_RSE_CHANNEL_UNAVAILABLE` if the channel was not established
    ///   `DRIVER_RSE_RECORD_FAILED` if the RSE did not record the measurement
    pub fn measure_and_record(
        &mut self,
        digest: &mut dyn DigestService,
        image: &ImageInfo,
        image_id: u32,
    ) -> MbootResult<()> {
        let Some(metadata) = self.registry.lookup(image_id) else {
            return Ok(());
        };
        if !self.available {
            return Err(MbootError::DRIVER_RSE_CHANNEL_UNAVAILABLE);
        }

        let value = digest.digest(image.data())?;
        let measurement = RseMeasurement {
            slot: metadata.destination_slot,
            signer_id: metadata.signer_id(),
            version: &[],
            measurement_algo: RSE_MBOOT_ALG_SHA256,
            sw_type: metadata.type_label,
            measurement_value: &value,
            lock_measurement: metadata.lock_after_record,
        };
        self.comms.extend_measurement(&measurement).map_err(|err| {
            cprintln!(
                "[mboot] RSE rejected slot {} ({})",
                measurement.slot,
                err
            );
            MbootError::DRIVER_RSE_RECORD_FAILED
        })
    }
}
