/*++

Licensed under the Apache-2.0 license.

File Name:

    event_log.rs

Abstract:

    File contains the TCG2 event log the boot stage records image
    measurements into.

    The log starts with a Specification ID event and a StartupLocality
    event. Every measurement is a crypto-agile TCG_PCR_EVENT2 carrying a
    single SHA-256 digest and the NUL terminated software type as event data.

--*/

use crate::digest::{DigestService, DigestValue, DIGEST_SIZE, TPM_ALG_SHA256};
use crate::metadata::MetadataRegistry;
use crate::printer::HexBytes;
use crate::{cprintln, ImageInfo};
use core::mem::size_of;
use mboot_error::{MbootError, MbootResult};
use zerocopy::little_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};
use zeroize::Zeroize;

pub const EV_POST_CODE: u32 = 0x0000_0001;
pub const EV_NO_ACTION: u32 = 0x0000_0003;

const TCG_SPEC_ID_SIGNATURE: &[u8; 16] = b"Spec ID Event03\0";
const TCG_STARTUP_LOCALITY_SIGNATURE: &[u8; 16] = b"StartupLocality\0";
const TCG_SHA1_DIGEST_SIZE: usize = 20;
const TCG_SPEC_VERSION_MAJOR: u8 = 2;
const TCG_SPEC_VERSION_MINOR: u8 = 0;
const TCG_SPEC_ERRATA: u8 = 2;
const TCG_UINTN_SIZE_64: u8 = 2;

/// Legacy TCG_PCClientPCREvent header, only used by the Specification ID event.
#[repr(C)]
#[derive(IntoBytes, FromBytes, KnownLayout, Immutable, Unaligned, Default)]
struct TcgPcClientPcrEventHeader {
    pcr_index: U32,
    event_type: U32,
    digest: [u8; TCG_SHA1_DIGEST_SIZE],
    event_size: U32,
}

/// TCG_EfiSpecIdEvent with a single digest algorithm.
#[repr(C)]
#[derive(IntoBytes, FromBytes, KnownLayout, Immutable, Unaligned)]
struct TcgEfiSpecIdEvent {
    signature: [u8; 16],
    platform_class: U32,
    spec_version_minor: u8,
    spec_version_major: u8,
    spec_errata: u8,
    uintn_size: u8,
    number_of_algorithms: U32,
    algorithm_id: U16,
    digest_size: U16,
    vendor_info_size: u8,
}

/// TCG_PCR_EVENT2 up to and including `event_size`, with a single digest.
#[repr(C)]
#[derive(IntoBytes, FromBytes, KnownLayout, Immutable, Unaligned)]
struct TcgPcrEvent2Header {
    pcr_index: U32,
    event_type: U32,
    digest_count: U32,
    algorithm_id: U16,
    digest: [u8; DIGEST_SIZE],
    event_size: U32,
}

impl TcgPcrEvent2Header {
    fn new(pcr_index: u32, event_type: u32, digest: &DigestValue, event_size: usize) -> Self {
        Self {
            pcr_index: U32::new(pcr_index),
            event_type: U32::new(event_type),
            digest_count: U32::new(1),
            algorithm_id: U16::new(TPM_ALG_SHA256),
            digest: *digest,
            event_size: U32::new(event_size as u32),
        }
    }
}

const STARTUP_LOCALITY_EVENT_SIZE: usize = TCG_STARTUP_LOCALITY_SIGNATURE.len() + 1;

/// Bytes taken by the Specification ID and StartupLocality events.
pub const EVENT_LOG_HEADER_SIZE: usize = size_of::<TcgPcClientPcrEventHeader>()
    + size_of::<TcgEfiSpecIdEvent>()
    + size_of::<TcgPcrEvent2Header>()
    + STARTUP_LOCALITY_EVENT_SIZE;

/// Bytes taken by a measurement record, excluding the event data.
pub const EVENT_LOG_RECORD_HEADER_SIZE: usize = size_of::<TcgPcrEvent2Header>();

/// Measurement of a single image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventLogRecord<'a> {
    pub image_id: u32,
    pub type_label: &'a str,
    pub pcr_index: u32,
    pub digest: DigestValue,
}

impl EventLogRecord<'_> {
    /// Size of the serialized record.
    pub fn size(&self) -> usize {
        EVENT_LOG_RECORD_HEADER_SIZE + self.type_label.len() + 1
    }
}

/// Append-only event log backed by a caller provided buffer.
pub struct EventLog<'a> {
    buf: &'a mut [u8],
    cur_size: usize,
}

impl<'a> EventLog<'a> {
    /// Reset `buf` and write the log header into it.
    ///
    /// # Arguments
    ///
    /// * `buf` - Event log storage, owned by the log for the rest of the stage
    ///
    /// # Returns
    ///
    /// * `EventLog` - Log holding the header only
    ///   `DRIVER_EVENT_LOG_INSUFFICIENT_CAPACITY` if the header does not fit
    pub fn init(buf: &'a mut [u8]) -> MbootResult<Self> {
        if buf.len() < EVENT_LOG_HEADER_SIZE {
            return Err(MbootError::DRIVER_EVENT_LOG_INSUFFICIENT_CAPACITY);
        }
        buf.zeroize();

        let mut log = Self { buf, cur_size: 0 };
        log.write_header();
        Ok(log)
    }

    fn write_header(&mut self) {
        let spec_id = TcgEfiSpecIdEvent {
            signature: *TCG_SPEC_ID_SIGNATURE,
            platform_class: U32::new(0),
            spec_version_minor: TCG_SPEC_VERSION_MINOR,
            spec_version_major: TCG_SPEC_VERSION_MAJOR,
            spec_errata: TCG_SPEC_ERRATA,
            uintn_size: TCG_UINTN_SIZE_64,
            number_of_algorithms: U32::new(1),
            algorithm_id: U16::new(TPM_ALG_SHA256),
            digest_size: U16::new(DIGEST_SIZE as u16),
            vendor_info_size: 0,
        };
        let spec_id_header = TcgPcClientPcrEventHeader {
            event_type: U32::new(EV_NO_ACTION),
            event_size: U32::new(size_of::<TcgEfiSpecIdEvent>() as u32),
            ..Default::default()
        };
        self.write(spec_id_header.as_bytes());
        self.write(spec_id.as_bytes());

        let locality = TcgPcrEvent2Header::new(
            0,
            EV_NO_ACTION,
            &[0; DIGEST_SIZE],
            STARTUP_LOCALITY_EVENT_SIZE,
        );
        self.write(locality.as_bytes());
        self.write(TCG_STARTUP_LOCALITY_SIGNATURE);
        // Locality 0
        self.write(&[0]);
    }

    // Callers check the remaining capacity first.
    fn write(&mut self, bytes: &[u8]) {
        let end = self.cur_size + bytes.len();
        self.buf[self.cur_size..end].copy_from_slice(bytes);
        self.cur_size = end;
    }

    /// Append a measurement record; nothing is written on failure.
    ///
    /// # Returns
    ///
    /// * `()` - Ok
    ///   `DRIVER_EVENT_LOG_INVALID_LABEL` if the label holds a NUL byte
    ///   `DRIVER_EVENT_LOG_OVERFLOW` if the record does not fit
    pub fn append(&mut self, record: &EventLogRecord) -> MbootResult<()> {
        let label = record.type_label.as_bytes();
        if label.contains(&0) {
            return Err(MbootError::DRIVER_EVENT_LOG_INVALID_LABEL);
        }
        if record.size() > self.remaining() {
            return Err(MbootError::DRIVER_EVENT_LOG_OVERFLOW);
        }

        let header = TcgPcrEvent2Header::new(
            record.pcr_index,
            EV_POST_CODE,
            &record.digest,
            label.len() + 1,
        );
        self.write(header.as_bytes());
        self.write(label);
        self.write(&[0]);
        Ok(())
    }

    /// Measure `image` and record it if `image_id` is tracked by `registry`.
    ///
    /// Images missing from the registry are not recorded and are not an error.
    pub fn measure_and_record(
        &mut self,
        digest: &mut dyn DigestService,
        image: &ImageInfo,
        image_id: u32,
        registry: MetadataRegistry,
    ) -> MbootResult<()> {
        let Some(metadata) = registry.lookup(image_id) else {
            return Ok(());
        };

        let record = EventLogRecord {
            image_id,
            type_label: metadata.type_label,
            pcr_index: metadata.destination_slot,
            digest: digest.digest(image.data())?,
        };
        self.append(&record)
    }

    /// Address consumers use to locate the log.
    pub fn base_address(&self) -> u64 {
        self.buf.as_ptr() as u64
    }

    /// Bytes written so far, header included.
    pub fn current_size(&self) -> usize {
        self.cur_size
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.cur_size
    }

    /// Filled part of the log, as handed to later stages.
    pub fn finalize(&self) -> &[u8] {
        &self.buf[..self.cur_size]
    }
}

/// A parsed event of the log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventLogEntry<'a> {
    pub pcr_index: u32,
    pub event_type: u32,
    pub digest: DigestValue,
    pub event_data: &'a [u8],
}

impl<'a> EventLogEntry<'a> {
    /// Event data with its NUL terminator removed, if it is valid UTF-8.
    pub fn type_label(&self) -> Option<&'a str> {
        let data = self.event_data.strip_suffix(&[0]).unwrap_or(self.event_data);
        core::str::from_utf8(data).ok()
    }
}

/// Iterator over the events following the log header.
pub struct EventLogIter<'a> {
    remaining: &'a [u8],
}

impl<'a> EventLogIter<'a> {
    /// # Returns
    ///
    /// * `EventLogIter` - Iterator positioned after the header
    ///   `DRIVER_EVENT_LOG_MALFORMED` if `log` does not start with a valid header
    pub fn new(log: &'a [u8]) -> MbootResult<Self> {
        let (header, rest) = TcgPcClientPcrEventHeader::ref_from_prefix(log)
            .map_err(|_| MbootError::DRIVER_EVENT_LOG_MALFORMED)?;
        let (spec_id, _) = TcgEfiSpecIdEvent::ref_from_prefix(rest)
            .map_err(|_| MbootError::DRIVER_EVENT_LOG_MALFORMED)?;
        if header.event_type.get() != EV_NO_ACTION
            || spec_id.signature != *TCG_SPEC_ID_SIGNATURE
            || spec_id.algorithm_id.get() != TPM_ALG_SHA256
            || log.len() < EVENT_LOG_HEADER_SIZE
        {
            return Err(MbootError::DRIVER_EVENT_LOG_MALFORMED);
        }
        Ok(Self {
            remaining: &log[EVENT_LOG_HEADER_SIZE..],
        })
    }

    fn parse_next(&mut self) -> MbootResult<EventLogEntry<'a>> {
        let (header, rest) = TcgPcrEvent2Header::ref_from_prefix(self.remaining)
            .map_err(|_| MbootError::DRIVER_EVENT_LOG_MALFORMED)?;
        if header.digest_count.get() != 1 || header.algorithm_id.get() != TPM_ALG_SHA256 {
            return Err(MbootError::DRIVER_EVENT_LOG_MALFORMED);
        }
        let event_size = header.event_size.get() as usize;
        let event_data = rest
            .get(..event_size)
            .ok_or(MbootError::DRIVER_EVENT_LOG_MALFORMED)?;
        self.remaining = &rest[event_size..];
        Ok(EventLogEntry {
            pcr_index: header.pcr_index.get(),
            event_type: header.event_type.get(),
            digest: header.digest,
            event_data,
        })
    }
}

impl<'a> Iterator for EventLogIter<'a> {
    type Item = MbootResult<EventLogEntry<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.is_empty() {
            return None;
        }
        let entry = self.parse_next();
        if entry.is_err() {
            self.remaining = &[];
        }
        Some(entry)
    }
}

/// Print every event of `log` to the console.
pub fn dump_event_log(log: &[u8]) {
    cprintln!("[mboot] Event log size: {} bytes", log.len());
    let events = match EventLogIter::new(log) {
        Ok(events) => events,
        Err(err) => {
            cprintln!("[mboot] Invalid event log header: {}", err);
            return;
        }
    };
    for entry in events {
        match entry {
            Ok(entry) => {
                cprintln!("[mboot] PCR_Index : {}", entry.pcr_index);
                cprintln!("[mboot] EventType : {}", entry.event_type);
                cprintln!("[mboot] Digest    : {}", HexBytes(&entry.digest));
                cprintln!("[mboot] Event     : {}", entry.type_label().unwrap_or("?"));
            }
            Err(err) => cprintln!("[mboot] Truncated event log: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::Sha256Sw;
    use crate::metadata::ImageMeasurementMetadata;

    const LABEL: &str = "BL_31";

    fn record(label: &str) -> EventLogRecord {
        EventLogRecord {
            image_id: 3,
            type_label: label,
            pcr_index: 0,
            digest: [0x11; DIGEST_SIZE],
        }
    }

    #[test]
    fn test_layout() {
        assert_eq!(size_of::<TcgPcClientPcrEventHeader>(), 32);
        assert_eq!(size_of::<TcgEfiSpecIdEvent>(), 33);
        assert_eq!(EVENT_LOG_RECORD_HEADER_SIZE, 50);
        assert_eq!(EVENT_LOG_HEADER_SIZE, 132);
    }

    #[test]
    fn test_init() {
        let mut buf = [0xffu8; 256];
        let log = EventLog::init(&mut buf).unwrap();
        assert_eq!(log.current_size(), EVENT_LOG_HEADER_SIZE);
        assert_eq!(log.capacity(), 256);
        assert_eq!(log.remaining(), 256 - EVENT_LOG_HEADER_SIZE);

        let bytes = log.finalize();
        assert_eq!(&bytes[32..48], TCG_SPEC_ID_SIGNATURE);
        assert_eq!(EventLogIter::new(bytes).unwrap().count(), 0);
        drop(log);
        assert!(buf[EVENT_LOG_HEADER_SIZE..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_init_insufficient_capacity() {
        let mut buf = [0u8; EVENT_LOG_HEADER_SIZE - 1];
        assert_eq!(
            EventLog::init(&mut buf).err(),
            Some(MbootError::DRIVER_EVENT_LOG_INSUFFICIENT_CAPACITY)
        );

        let mut buf = [0u8; EVENT_LOG_HEADER_SIZE];
        let log = EventLog::init(&mut buf).unwrap();
        assert_eq!(log.remaining(), 0);
    }

    #[test]
    fn test_append() {
        let mut buf = [0u8; 512];
        let mut log = EventLog::init(&mut buf).unwrap();
        log.append(&record(LABEL)).unwrap();
        assert_eq!(
            log.current_size(),
            EVENT_LOG_HEADER_SIZE + EVENT_LOG_RECORD_HEADER_SIZE + LABEL.len() + 1
        );

        let entries: Vec<_> = EventLogIter::new(log.finalize())
            .unwrap()
            .collect::<MbootResult<_>>()
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].pcr_index, 0);
        assert_eq!(entries[0].event_type, EV_POST_CODE);
        assert_eq!(entries[0].digest, [0x11; DIGEST_SIZE]);
        assert_eq!(entries[0].event_data, b"BL_31\0");
        assert_eq!(entries[0].type_label(), Some(LABEL));
    }

    #[test]
    fn test_append_overflow_leaves_log_untouched() {
        let rec = record(LABEL);
        let mut buf = vec![0u8; EVENT_LOG_HEADER_SIZE + rec.size() + rec.size() - 1];
        let mut log = EventLog::init(&mut buf).unwrap();
        log.append(&rec).unwrap();

        let size = log.current_size();
        let snapshot = log.finalize().to_vec();
        assert_eq!(log.append(&rec), Err(MbootError::DRIVER_EVENT_LOG_OVERFLOW));
        assert_eq!(log.current_size(), size);
        assert_eq!(log.finalize(), &snapshot[..]);
        drop(log);
        assert!(buf[size..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_append_exact_fit() {
        let rec = record(LABEL);
        let mut buf = vec![0u8; EVENT_LOG_HEADER_SIZE + rec.size()];
        let mut log = EventLog::init(&mut buf).unwrap();
        log.append(&rec).unwrap();
        assert_eq!(log.remaining(), 0);
    }

    #[test]
    fn test_append_invalid_label() {
        let mut buf = [0u8; 512];
        let mut log = EventLog::init(&mut buf).unwrap();
        assert_eq!(
            log.append(&record("BL\031")),
            Err(MbootError::DRIVER_EVENT_LOG_INVALID_LABEL)
        );
        assert_eq!(log.current_size(), EVENT_LOG_HEADER_SIZE);
    }

    #[test]
    fn test_measure_and_record() {
        let table = [
            ImageMeasurementMetadata::new(3, 0, "BL_31"),
            ImageMeasurementMetadata::new(5, 1, "BL_33"),
            ImageMeasurementMetadata::SENTINEL,
        ];
        let registry = MetadataRegistry::new(&table);
        let image = [0x5au8; 100];
        let info = ImageInfo::new(0x4000_0000, &image);

        let mut buf = [0u8; 512];
        let mut log = EventLog::init(&mut buf).unwrap();
        log.measure_and_record(&mut Sha256Sw, &info, 5, registry)
            .unwrap();
        // Not tracked by this registry
        log.measure_and_record(&mut Sha256Sw, &info, 4, registry)
            .unwrap();

        let entries: Vec<_> = EventLogIter::new(log.finalize())
            .unwrap()
            .collect::<MbootResult<_>>()
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].pcr_index, 1);
        assert_eq!(entries[0].type_label(), Some("BL_33"));
        assert_eq!(entries[0].digest, Sha256Sw.digest(&image).unwrap());
    }

    #[test]
    fn test_iter_truncated() {
        let mut buf = [0u8; 512];
        let mut log = EventLog::init(&mut buf).unwrap();
        log.append(&record(LABEL)).unwrap();
        let size = log.current_size();
        let bytes = log.finalize();

        let mut events = EventLogIter::new(&bytes[..size - 2]).unwrap();
        assert_eq!(
            events.next(),
            Some(Err(MbootError::DRIVER_EVENT_LOG_MALFORMED))
        );
        assert_eq!(events.next(), None);
    }

    #[test]
    fn test_iter_bad_header() {
        assert_eq!(
            EventLogIter::new(&[0u8; 16]).err(),
            Some(MbootError::DRIVER_EVENT_LOG_MALFORMED)
        );
        assert_eq!(
            EventLogIter::new(&[0u8; EVENT_LOG_HEADER_SIZE]).err(),
            Some(MbootError::DRIVER_EVENT_LOG_MALFORMED)
        );
    }
}
