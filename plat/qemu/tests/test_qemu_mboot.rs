// Licensed under the Apache-2.0 license

use mboot_common::MbootState;
use mboot_drivers::{
    CacheMaintenance, ConfigChannel, EventLogIter, HandoffDescriptor, ImageInfo, MbootError,
    MbootResult, Sha256Sw,
};
use mboot_plat_qemu::image_ids::*;
use mboot_plat_qemu::{
    bl1_mboot, bl2_mboot, plat_mboot_measure_image, plat_mboot_measure_key, Bl1Env, Bl1Metadata,
    Bl2Env, Bl2Metadata, PLAT_EVENT_LOG_MAX_SIZE,
};

#[cfg(feature = "rse")]
use mboot_drivers::{RseComms, RseMeasurement};

#[derive(Default)]
struct FwConfig {
    fail: bool,
    published: Vec<HandoffDescriptor>,
}

impl ConfigChannel for FwConfig {
    fn name(&self) -> &'static str {
        "NT_FW_CONFIG"
    }

    fn publish(&mut self, descriptor: &HandoffDescriptor) -> MbootResult<()> {
        if self.fail {
            return Err(MbootError::MBOOT_HANDOFF_PRIMARY_CONFIG);
        }
        self.published.push(*descriptor);
        Ok(())
    }
}

#[derive(Default)]
struct Cache {
    flushed: Vec<(u64, usize)>,
}

impl CacheMaintenance for Cache {
    fn flush_dcache_range(&mut self, addr: u64, size: usize) {
        self.flushed.push((addr, size));
    }
}

#[cfg(feature = "rse")]
#[derive(Default)]
struct Rse {
    slots: Vec<(u32, String)>,
}

#[cfg(feature = "rse")]
impl RseComms for Rse {
    fn init(&mut self) -> MbootResult<()> {
        Ok(())
    }

    fn extend_measurement(&mut self, measurement: &RseMeasurement) -> MbootResult<()> {
        self.slots
            .push((measurement.slot, measurement.sw_type.to_string()));
        Ok(())
    }
}

#[test]
fn test_bl2_boot_flow() {
    let bl31 = [0x31u8; 512];
    let bl33 = [0x33u8; 512];
    let nt_fw_config = [0x27u8; 128];

    let mut event_log = [0u8; PLAT_EVENT_LOG_MAX_SIZE];
    let base = event_log.as_ptr() as u64;
    let metadata = Bl2Metadata::default();
    let mut digest = Sha256Sw;
    let mut cache = Cache::default();
    let mut nt_config = FwConfig::default();
    #[cfg(feature = "tos-fw-config")]
    let mut tos_config = FwConfig::default();
    #[cfg(feature = "rse")]
    let mut rse = Rse::default();

    let mut mboot = bl2_mboot(
        Bl2Env {
            digest: &mut digest,
            cache: &mut cache,
            event_log: &mut event_log,
            nt_fw_config: &mut nt_config,
            #[cfg(feature = "tos-fw-config")]
            tos_fw_config: &mut tos_config,
            #[cfg(feature = "rse")]
            rse_comms: &mut rse,
        },
        &metadata,
    );
    mboot.init().unwrap();

    plat_mboot_measure_image(&mut mboot, BL31_IMAGE_ID, &ImageInfo::new(0x0e09_0000, &bl31))
        .unwrap();
    plat_mboot_measure_image(&mut mboot, BL33_IMAGE_ID, &ImageInfo::new(0x6000_0000, &bl33))
        .unwrap();
    plat_mboot_measure_image(
        &mut mboot,
        NT_FW_CONFIG_ID,
        &ImageInfo::new(0x4000_0000, &nt_fw_config),
    )
    .unwrap();
    // BL2 does not measure itself
    plat_mboot_measure_image(&mut mboot, BL2_IMAGE_ID, &ImageInfo::new(0, &bl31)).unwrap();
    plat_mboot_measure_key(&mut mboot, b"1.3.6.1.4.1.4128.2100.102", &[0u8; 64]).unwrap();

    let descriptor = mboot.finish().unwrap().unwrap();
    assert_eq!(mboot.state(), MbootState::Finalized);
    drop(mboot);

    assert_eq!(descriptor.log_base_address, base);
    assert_eq!(nt_config.published, vec![descriptor]);
    assert_eq!(cache.flushed, vec![(base, descriptor.log_size as usize)]);
    #[cfg(feature = "tos-fw-config")]
    assert_eq!(tos_config.published, vec![descriptor]);
    #[cfg(feature = "rse")]
    assert_eq!(rse.slots, vec![(11, MBOOT_BL31_IMAGE_STRING.to_string())]);

    let labels: Vec<String> = EventLogIter::new(&event_log[..descriptor.log_size as usize])
        .unwrap()
        .map(|entry| {
            let entry = entry.unwrap();
            assert_eq!(entry.pcr_index, 0);
            entry.type_label().unwrap().to_string()
        })
        .collect();
    assert_eq!(
        labels,
        vec![
            MBOOT_BL31_IMAGE_STRING,
            MBOOT_BL33_IMAGE_STRING,
            MBOOT_NT_FW_CONFIG_STRING
        ]
    );
}

#[test]
fn test_bl2_log_full() {
    let image = [0u8; 64];
    let info = ImageInfo::new(0, &image);
    let mut event_log = [0u8; PLAT_EVENT_LOG_MAX_SIZE];
    let metadata = Bl2Metadata::default();
    let mut digest = Sha256Sw;
    let mut cache = Cache::default();
    let mut nt_config = FwConfig::default();
    #[cfg(feature = "tos-fw-config")]
    let mut tos_config = FwConfig::default();
    #[cfg(feature = "rse")]
    let mut rse = Rse::default();

    let mut mboot = bl2_mboot(
        Bl2Env {
            digest: &mut digest,
            cache: &mut cache,
            event_log: &mut event_log,
            nt_fw_config: &mut nt_config,
            #[cfg(feature = "tos-fw-config")]
            tos_fw_config: &mut tos_config,
            #[cfg(feature = "rse")]
            rse_comms: &mut rse,
        },
        &metadata,
    );
    mboot.init().unwrap();

    let mut recorded = 0;
    loop {
        match plat_mboot_measure_image(&mut mboot, BL33_IMAGE_ID, &info) {
            Ok(()) => recorded += 1,
            Err(err) => {
                assert_eq!(err, MbootError::DRIVER_EVENT_LOG_OVERFLOW);
                break;
            }
        }
    }
    assert!(recorded > 0);
    let log = mboot.event_log().unwrap();
    assert!(log.current_size() <= PLAT_EVENT_LOG_MAX_SIZE);

    // The stage still hands off what was recorded
    let size = log.current_size();
    let descriptor = mboot.finish().unwrap().unwrap();
    assert_eq!(descriptor.log_size as usize, size);
}

#[test]
#[should_panic]
fn test_bl2_nt_fw_config_failure_halts() {
    let mut event_log = [0u8; PLAT_EVENT_LOG_MAX_SIZE];
    let metadata = Bl2Metadata::default();
    let mut digest = Sha256Sw;
    let mut cache = Cache::default();
    let mut nt_config = FwConfig {
        fail: true,
        ..Default::default()
    };
    #[cfg(feature = "tos-fw-config")]
    let mut tos_config = FwConfig::default();
    #[cfg(feature = "rse")]
    let mut rse = Rse::default();

    let mut mboot = bl2_mboot(
        Bl2Env {
            digest: &mut digest,
            cache: &mut cache,
            event_log: &mut event_log,
            nt_fw_config: &mut nt_config,
            #[cfg(feature = "tos-fw-config")]
            tos_fw_config: &mut tos_config,
            #[cfg(feature = "rse")]
            rse_comms: &mut rse,
        },
        &metadata,
    );
    mboot.init().unwrap();
    let _ = mboot.finish();
}

#[test]
fn test_bl1_boot_flow() {
    let bl2 = [0x02u8; 256];
    let tb_fw_config = [0x24u8; 64];
    let metadata = Bl1Metadata::default();
    let mut digest = Sha256Sw;
    let mut cache = Cache::default();
    #[cfg(feature = "rse")]
    let mut rse = Rse::default();

    let mut mboot = bl1_mboot(
        Bl1Env {
            digest: &mut digest,
            cache: &mut cache,
            #[cfg(feature = "rse")]
            rse_comms: &mut rse,
        },
        &metadata,
    );
    mboot.init().unwrap();
    plat_mboot_measure_image(
        &mut mboot,
        TB_FW_CONFIG_ID,
        &ImageInfo::new(0x0e00_0000, &tb_fw_config),
    )
    .unwrap();
    plat_mboot_measure_image(&mut mboot, BL2_IMAGE_ID, &ImageInfo::new(0x0e01_0000, &bl2))
        .unwrap();
    assert!(mboot.event_log().is_none());
    assert_eq!(mboot.finish(), Ok(None));
    drop(mboot);

    assert!(cache.flushed.is_empty());
    #[cfg(feature = "rse")]
    assert_eq!(
        rse.slots,
        vec![
            (9, MBOOT_TB_FW_CONFIG_STRING.to_string()),
            (10, MBOOT_BL2_IMAGE_STRING.to_string())
        ]
    );
}
