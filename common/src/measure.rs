/*++

Licensed under the Apache-2.0 license.

File Name:

    measure.rs

Abstract:

    File contains the routine recording an image measurement into every
    configured sink.

--*/

use mboot_drivers::{
    cprintln, DigestService, EventLog, ImageInfo, MetadataRegistry, RseSession,
};
use mboot_error::{MbootError, MbootResult};

/// Measure an image into the event log and the RSE.
///
/// Every configured sink is attempted; a failing sink never prevents the
/// next one from recording.
///
/// # Arguments
///
/// * `digest` - Digest service
/// * `event_log` - Event log and its metadata registry, if the stage keeps one
/// * `rse` - RSE session, if the platform forwards measurements to the RSE
/// * `image_id` - Platform image identifier
/// * `image` - Loaded image
///
/// # Returns
///
/// * `()` - Ok, including for images no sink tracks
///   Error of the failing sink if only one failed
///   `MBOOT_MULTIPLE_SINKS_FAILED` if both failed
pub fn measure_and_record_all(
    digest: &mut dyn DigestService,
    event_log: Option<(&mut EventLog, MetadataRegistry)>,
    rse: Option<&mut RseSession>,
    image_id: u32,
    image: &ImageInfo,
) -> MbootResult<()> {
    let mut result = Ok(());

    if let Some((log, registry)) = event_log {
        if let Err(err) = log.measure_and_record(digest, image, image_id, registry) {
            cprintln!("[mboot] Failed to record image id {} ({})", image_id, err);
            result = Err(err);
        }
    }

    if let Some(rse) = rse {
        if let Err(err) = rse.measure_and_record(digest, image, image_id) {
            cprintln!(
                "[mboot] Failed to record in RSE image id {} ({})",
                image_id,
                err
            );
            result = match result {
                Ok(()) => Err(err),
                Err(_) => Err(MbootError::MBOOT_MULTIPLE_SINKS_FAILED),
            };
        }
    }

    result
}
