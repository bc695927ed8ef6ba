/*++

Licensed under the Apache-2.0 license.

File Name:

    digest.rs

Abstract:

    File contains the digest service used to measure images.

--*/

use mboot_error::MbootResult;
use sha2::{Digest, Sha256};

/// TCG algorithm id of the measurement digest.
pub const TPM_ALG_SHA256: u16 = 0x000B;

/// Size of a measurement digest in bytes.
pub const DIGEST_SIZE: usize = 32;

pub type DigestValue = [u8; DIGEST_SIZE];

/// Deterministic hash over an image.
pub trait DigestService {
    /// Compute the measurement digest of `data`.
    fn digest(&mut self, data: &[u8]) -> MbootResult<DigestValue>;
}

/// SHA-256 computed in software.
#[derive(Default, Debug)]
pub struct Sha256Sw;

impl DigestService for Sha256Sw {
    fn digest(&mut self, data: &[u8]) -> MbootResult<DigestValue> {
        let mut value = [0u8; DIGEST_SIZE];
        value.copy_from_slice(&Sha256::digest(data));
        Ok(value)
    }
}
