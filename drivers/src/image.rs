// Licensed under the Apache-2.0 license

/// Location and contents of a loaded image.
#[derive(Clone, Copy, Debug)]
pub struct ImageInfo<'a> {
    image_base: u64,
    image: &'a [u8],
}

impl<'a> ImageInfo<'a> {
    pub fn new(image_base: u64, image: &'a [u8]) -> Self {
        Self { image_base, image }
    }

    /// Describe an image loaded at `image_base`.
    ///
    /// # Safety
    ///
    /// `[image_base, image_base + image_size)` must be mapped, readable and
    /// left unmodified while the returned value is alive.
    pub unsafe fn from_raw(image_base: usize, image_size: usize) -> Self {
        Self {
            image_base: image_base as u64,
            image: core::slice::from_raw_parts(image_base as *const u8, image_size),
        }
    }

    pub fn image_base(&self) -> u64 {
        self.image_base
    }

    pub fn image_size(&self) -> usize {
        self.image.len()
    }

    pub fn data(&self) -> &'a [u8] {
        self.image
    }
}
