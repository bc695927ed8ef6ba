/*++

Licensed under the Apache-2.0 license.

File Name:

    bl1.rs

Abstract:

    File contains the BL1 measured boot port of the QEMU platform. BL1
    keeps no event log; with the `rse` feature it forwards the measurements
    of the images it loads to the RSE, otherwise every operation is a no-op.

--*/

use crate::metadata::Bl1Metadata;
use mboot_common::MeasuredBoot;
use mboot_drivers::{CacheMaintenance, DigestService};

#[cfg(feature = "rse")]
use mboot_drivers::{MetadataRegistry, RseComms, RseSession};

/// Services the BL1 measured boot runs on.
pub struct Bl1Env<'a> {
    pub digest: &'a mut dyn DigestService,
    pub cache: &'a mut dyn CacheMaintenance,

    #[cfg(feature = "rse")]
    pub rse_comms: &'a mut dyn RseComms,
}

/// Build the BL1 measured boot pipeline.
pub fn bl1_mboot<'a>(env: Bl1Env<'a>, metadata: &'a Bl1Metadata) -> MeasuredBoot<'a> {
    let mboot = MeasuredBoot::new(env.digest, env.cache);

    cfg_if::cfg_if! {
        if #[cfg(feature = "rse")] {
            let mboot = mboot.with_rse(RseSession::new(
                env.rse_comms,
                MetadataRegistry::new(&metadata.rse),
            ));
        } else {
            let _ = metadata;
        }
    }

    mboot
}
