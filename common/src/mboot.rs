/*++

Licensed under the Apache-2.0 license.

File Name:

    mboot.rs

Abstract:

    File contains the measured boot lifecycle of a boot stage: event log
    and RSE setup, per image measurement and the event log handoff to the
    next stages.

--*/

use crate::boot_status::MbootState;
use crate::measure::measure_and_record_all;
use mboot_drivers::hand_off::dump_handoff_descriptor;
use mboot_drivers::{
    cprintln, dump_event_log, report_error_non_fatal, report_fatal_error_and_halt,
    CacheMaintenance, ConfigChannel, DigestService, EventLog, HandoffDescriptor, ImageInfo,
    MetadataRegistry, RseSession,
};
use mboot_error::{MbootError, MbootResult};

/// Event log of a stage together with the configuration slots it is handed off through.
pub struct EventLogSink<'a> {
    buf: Option<&'a mut [u8]>,
    log: Option<EventLog<'a>>,
    registry: MetadataRegistry<'a>,
    handoff: &'a mut dyn ConfigChannel,
    alt_handoff: Option<&'a mut dyn ConfigChannel>,
}

impl<'a> EventLogSink<'a> {
    /// # Arguments
    ///
    /// * `buf` - Event log storage
    /// * `registry` - Images recorded in the event log
    /// * `handoff` - Configuration slot the log must be published to
    pub fn new(
        buf: &'a mut [u8],
        registry: MetadataRegistry<'a>,
        handoff: &'a mut dyn ConfigChannel,
    ) -> Self {
        Self {
            buf: Some(buf),
            log: None,
            registry,
            handoff,
            alt_handoff: None,
        }
    }

    /// Also publish the log to `alt_handoff`; failing to do so does not stop the boot.
    pub fn with_alt_handoff(mut self, alt_handoff: &'a mut dyn ConfigChannel) -> Self {
        self.alt_handoff = Some(alt_handoff);
        self
    }

    /// Event log, once the stage is initialized.
    pub fn log(&self) -> Option<&EventLog<'a>> {
        self.log.as_ref()
    }
}

/// Measured boot pipeline of one boot stage.
pub struct MeasuredBoot<'a> {
    state: MbootState,
    digest: &'a mut dyn DigestService,
    cache: &'a mut dyn CacheMaintenance,
    event_log: Option<EventLogSink<'a>>,
    rse: Option<RseSession<'a>>,
}

impl<'a> MeasuredBoot<'a> {
    /// Pipeline without sinks; add them with `with_event_log` and `with_rse`.
    pub fn new(digest: &'a mut dyn DigestService, cache: &'a mut dyn CacheMaintenance) -> Self {
        Self {
            state: MbootState::Uninitialized,
            digest,
            cache,
            event_log: None,
            rse: None,
        }
    }

    pub fn with_event_log(mut self, event_log: EventLogSink<'a>) -> Self {
        self.event_log = Some(event_log);
        self
    }

    pub fn with_rse(mut self, rse: RseSession<'a>) -> Self {
        self.rse = Some(rse);
        self
    }

    pub fn state(&self) -> MbootState {
        self.state
    }

    pub fn event_log(&self) -> Option<&EventLog<'a>> {
        self.event_log.as_ref().and_then(|sink| sink.log())
    }

    pub fn rse(&self) -> Option<&RseSession<'a>> {
        self.rse.as_ref()
    }

    /// Initialize the event log and the RSE session.
    ///
    /// # Returns
    ///
    /// * `()` - Ok, also when the RSE cannot be reached
    ///   `DRIVER_EVENT_LOG_INSUFFICIENT_CAPACITY` if the log buffer cannot hold the header
    ///   `MBOOT_INVALID_STATE` if the stage was already initialized
    pub fn init(&mut self) -> MbootResult<()> {
        if self.state != MbootState::Uninitialized {
            return Err(MbootError::MBOOT_INVALID_STATE);
        }

        if let Some(sink) = self.event_log.as_mut() {
            let buf = sink.buf.take().ok_or(MbootError::MBOOT_INVALID_STATE)?;
            let log = EventLog::init(buf).map_err(|err| {
                cprintln!("[mboot] Unable to initialize the event log ({})", err);
                err
            })?;
            cprintln!(
                "[mboot] Event log initialized, {} of {} bytes used",
                log.current_size(),
                log.capacity()
            );
            sink.log = Some(log);
        }

        if let Some(rse) = self.rse.as_mut() {
            // The event log stays the primary record without the RSE.
            if let Err(err) = rse.init() {
                report_error_non_fatal("init", err);
            }
        }

        self.state = MbootState::Initialized;
        Ok(())
    }

    /// Measure a loaded image into every sink tracking `image_id`.
    ///
    /// Measurement failures are reported to the caller but never stop the
    /// stage from measuring further images.
    pub fn measure(&mut self, image_id: u32, image: &ImageInfo) -> MbootResult<()> {
        if !self.state.accepts_measurements() {
            return Err(MbootError::MBOOT_INVALID_STATE);
        }
        self.state = MbootState::Measuring;

        let event_log = self.event_log.as_mut().and_then(|sink| {
            let registry = sink.registry;
            sink.log.as_mut().map(|log| (log, registry))
        });
        measure_and_record_all(
            &mut *self.digest,
            event_log,
            self.rse.as_mut(),
            image_id,
            image,
        )
    }

    /// Reserved for key measurement.
    pub fn measure_key(&mut self, _key_oid: &[u8], _key: &[u8]) -> MbootResult<()> {
        Ok(())
    }

    /// Finish the stage: publish the event log and stop accepting measurements.
    ///
    /// Failing to publish the log to its mandatory configuration slot halts
    /// the boot, later stages rely on the log being there.
    ///
    /// # Returns
    ///
    /// * `Option<HandoffDescriptor>` - Published descriptor, `None` for stages without event log
    ///   `MBOOT_INVALID_STATE` if the stage is not initialized or already finished
    pub fn finish(&mut self) -> MbootResult<Option<HandoffDescriptor>> {
        match self.try_finish() {
            Err(err) if err == MbootError::MBOOT_HANDOFF_PRIMARY_CONFIG => {
                report_fatal_error_and_halt("finish", err)
            }
            result => result,
        }
    }

    /// Same as `finish`, but a failed mandatory publish is returned as
    /// `MBOOT_HANDOFF_PRIMARY_CONFIG` instead of halting.
    pub fn try_finish(&mut self) -> MbootResult<Option<HandoffDescriptor>> {
        if !self.state.accepts_measurements() {
            return Err(MbootError::MBOOT_INVALID_STATE);
        }

        let Some(sink) = self.event_log.as_mut() else {
            self.state = MbootState::Finalized;
            return Ok(None);
        };
        let log = sink.log.as_ref().ok_or(MbootError::MBOOT_INVALID_STATE)?;
        let descriptor = HandoffDescriptor::new(log.base_address(), log.current_size());

        if let Err(err) = sink.handoff.publish(&descriptor) {
            cprintln!(
                "[mboot] Unable to update {} ({})",
                sink.handoff.name(),
                err
            );
            return Err(MbootError::MBOOT_HANDOFF_PRIMARY_CONFIG);
        }
        dump_handoff_descriptor(sink.handoff.name(), &descriptor);

        // The log is read from outside the secure world.
        self.cache
            .flush_dcache_range(descriptor.log_base_address, log.current_size());

        if let Some(alt_handoff) = sink.alt_handoff.as_mut() {
            match alt_handoff.publish(&descriptor) {
                Ok(()) => dump_handoff_descriptor(alt_handoff.name(), &descriptor),
                Err(err) => {
                    cprintln!(
                        "[mboot] Unable to update {} ({})",
                        alt_handoff.name(),
                        err
                    );
                    report_error_non_fatal("finish", MbootError::MBOOT_HANDOFF_SECONDARY_CONFIG);
                }
            }
        }

        dump_event_log(log.finalize());
        self.state = MbootState::Finalized;
        Ok(Some(descriptor))
    }
}
