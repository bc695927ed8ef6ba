/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains the error type and error codes used by the measured boot
    pipeline.

--*/
#![cfg_attr(not(feature = "std"), no_std)]
use core::convert::From;
use core::num::{NonZeroU32, TryFromIntError};

/// Measured Boot Error Type
/// Derives debug, copy, clone, eq, and partial eq
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MbootError(pub NonZeroU32);

/// Macro to define error constants ensuring uniqueness
///
/// This macro takes a list of (name, value, doc) tuples and generates
/// constant definitions for each error code.
#[macro_export]
macro_rules! define_error_constants {
    ($(($name:ident, $value:expr, $doc:expr)),* $(,)?) => {
        $(
            #[doc = $doc]
            pub const $name: MbootError = MbootError::new_const($value);
        )*

        #[cfg(test)]
        /// Returns a vector of all defined error constants for testing uniqueness
        pub fn all_constants() -> Vec<(&'static str, u32)> {
            vec![
                $(
                    (stringify!($name), $value),
                )*
            ]
        }
    };
}

impl MbootError {
    /// Create an error; intended to only be used from const contexts, as we don't want
    /// runtime panics if val is zero. The preferred way to get a MbootError from a u32 is to
    /// use `MbootError::try_from()` from the `TryFrom` trait impl.
    const fn new_const(val: u32) -> Self {
        match NonZeroU32::new(val) {
            Some(val) => Self(val),
            None => panic!("MbootError cannot be 0"),
        }
    }

    define_error_constants![
        (
            DRIVER_MBOOT_UNKNOWN_IMAGE_ID,
            0x0001_0001,
            "Metadata Error: image id is not present in the registry"
        ),
        (
            DRIVER_MBOOT_INVALID_SIGNER_ID,
            0x0001_0002,
            "Metadata Error: signer id size is out of bounds"
        ),
        (
            DRIVER_EVENT_LOG_INSUFFICIENT_CAPACITY,
            0x0002_0001,
            "Event Log Error: buffer is smaller than the log header"
        ),
        (
            DRIVER_EVENT_LOG_OVERFLOW,
            0x0002_0002,
            "Event Log Error: not enough space left for the record"
        ),
        (
            DRIVER_EVENT_LOG_INVALID_LABEL,
            0x0002_0003,
            "Event Log Error: type label does not fit an event"
        ),
        (
            DRIVER_EVENT_LOG_MALFORMED,
            0x0002_0004,
            "Event Log Error: log contents cannot be parsed"
        ),
        (
            DRIVER_RSE_CHANNEL_INIT,
            0x0003_0001,
            "RSE Error: communication channel could not be established"
        ),
        (
            DRIVER_RSE_CHANNEL_UNAVAILABLE,
            0x0003_0002,
            "RSE Error: communication channel is not available"
        ),
        (
            DRIVER_RSE_RECORD_FAILED,
            0x0003_0003,
            "RSE Error: measurement was not recorded by the RSE"
        ),
        (
            DRIVER_DIGEST_FAILURE,
            0x0004_0001,
            "Digest Error: image digest could not be computed"
        ),
        (
            MBOOT_INVALID_STATE,
            0x0010_0001,
            "Measured Boot Error: operation not valid in the current stage state"
        ),
        (
            MBOOT_MULTIPLE_SINKS_FAILED,
            0x0010_0002,
            "Measured Boot Error: both the event log and the RSE failed to record"
        ),
        (
            MBOOT_HANDOFF_PRIMARY_CONFIG,
            0x0010_0003,
            "Measured Boot Error: unable to publish the event log to the primary config"
        ),
        (
            MBOOT_HANDOFF_SECONDARY_CONFIG,
            0x0010_0004,
            "Measured Boot Error: unable to publish the event log to the secondary config"
        ),
    ];
}

impl From<core::num::NonZeroU32> for crate::MbootError {
    fn from(val: core::num::NonZeroU32) -> Self {
        crate::MbootError(val)
    }
}

impl From<MbootError> for core::num::NonZeroU32 {
    fn from(val: MbootError) -> Self {
        val.0
    }
}

impl From<MbootError> for u32 {
    fn from(val: MbootError) -> Self {
        core::num::NonZeroU32::from(val).get()
    }
}

impl TryFrom<u32> for MbootError {
    type Error = TryFromIntError;
    fn try_from(val: u32) -> Result<Self, TryFromIntError> {
        match NonZeroU32::try_from(val) {
            Ok(val) => Ok(MbootError(val)),
            Err(err) => Err(err),
        }
    }
}

impl ufmt::uDisplay for MbootError {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        f.write_str("0x")?;
        for nibble in (0..8).rev().map(|i| (u32::from(*self) >> (i * 4)) & 0xf) {
            let c = match nibble {
                0..=9 => b'0' + nibble as u8,
                _ => b'A' + (nibble as u8 - 10),
            };
            f.write_char(c as char)?;
        }
        Ok(())
    }
}

pub type MbootResult<T> = Result<T, MbootError>;
