/*++

Licensed under the Apache-2.0 license.

File Name:

    bl2.rs

Abstract:

    File contains the BL2 measured boot port of the QEMU platform. BL2
    keeps the event log handed to the secure and normal world payloads and,
    with the `rse` feature, forwards measurements to the RSE.

--*/

use crate::metadata::Bl2Metadata;
use mboot_common::{EventLogSink, MeasuredBoot};
use mboot_drivers::{CacheMaintenance, ConfigChannel, DigestService, MetadataRegistry};

#[cfg(feature = "rse")]
use mboot_drivers::{RseComms, RseSession};

/// Services the BL2 measured boot runs on.
pub struct Bl2Env<'a> {
    /// Digest service
    pub digest: &'a mut dyn DigestService,

    /// Data cache maintenance
    pub cache: &'a mut dyn CacheMaintenance,

    /// Event log storage, `PLAT_EVENT_LOG_MAX_SIZE` bytes on QEMU
    pub event_log: &'a mut [u8],

    /// NT_FW_CONFIG, read by OP-TEE to locate the event log
    pub nt_fw_config: &'a mut dyn ConfigChannel,

    /// TOS_FW_CONFIG of the secure payload dispatcher
    #[cfg(feature = "tos-fw-config")]
    pub tos_fw_config: &'a mut dyn ConfigChannel,

    /// Transport to the RSE
    #[cfg(feature = "rse")]
    pub rse_comms: &'a mut dyn RseComms,
}

/// Build the BL2 measured boot pipeline.
///
/// # Arguments
///
/// * `env` - Platform services
/// * `metadata` - Measurement metadata tables
///
/// # Returns
///
/// * `MeasuredBoot` - Uninitialized pipeline
pub fn bl2_mboot<'a>(env: Bl2Env<'a>, metadata: &'a Bl2Metadata) -> MeasuredBoot<'a> {
    let sink = EventLogSink::new(
        env.event_log,
        MetadataRegistry::new(&metadata.event_log),
        env.nt_fw_config,
    );

    cfg_if::cfg_if! {
        if #[cfg(feature = "tos-fw-config")] {
            let sink = sink.with_alt_handoff(env.tos_fw_config);
        }
    }

    let mboot = MeasuredBoot::new(env.digest, env.cache).with_event_log(sink);

    cfg_if::cfg_if! {
        if #[cfg(feature = "rse")] {
            let mboot = mboot.with_rse(RseSession::new(
                env.rse_comms,
                MetadataRegistry::new(&metadata.rse),
            ));
        }
    }

    mboot
}
