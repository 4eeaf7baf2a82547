use core::fmt;

use serde::{
    de::{self, SeqAccess, Visitor},
    ser::SerializeTuple,
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::journal::JournalError;

/// Width of the stored half-canvas in pixels.
pub const WIDTH: u64 = 32;
/// Height of the canvas in pixels.
pub const HEIGHT: u64 = 64;
/// 32×64 pixels at one bit each.
pub const IMAGE_BYTES: usize = (WIDTH * HEIGHT / 8) as usize;

/// Binary half-canvas committed by the guest (1 bit per pixel).
///
/// Pixels are stored row-major, most significant bit first within each byte.
/// The buffer is always exactly [`IMAGE_BYTES`] long; there is no way to build
/// one from a slice of any other length.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BinaryImage([u8; IMAGE_BYTES]);

impl BinaryImage {
    pub const fn new() -> Self {
        Self([0u8; IMAGE_BYTES])
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, JournalError> {
        let data: [u8; IMAGE_BYTES] =
            bytes
                .try_into()
                .map_err(|_| JournalError::InvalidImageLength {
                    expected: IMAGE_BYTES,
                    actual: bytes.len(),
                })?;
        Ok(Self(data))
    }

    pub fn as_bytes(&self) -> &[u8; IMAGE_BYTES] {
        &self.0
    }

    pub fn set_pixel(&mut self, x: u64, y: u64, value: bool) {
        if let Some((byte, mask)) = Self::locate(x, y) {
            if value {
                self.0[byte] |= mask;
            } else {
                self.0[byte] &= !mask;
            }
        }
    }

    /// Out-of-range coordinates read as background.
    pub fn get_pixel(&self, x: u64, y: u64) -> bool {
        Self::locate(x, y)
            .map(|(byte, mask)| self.0[byte] & mask != 0)
            .unwrap_or(false)
    }

    /// Number of foreground pixels.
    pub fn count_foreground(&self) -> u32 {
        self.0.iter().map(|b| b.count_ones()).sum()
    }

    fn locate(x: u64, y: u64) -> Option<(usize, u8)> {
        if x >= WIDTH || y >= HEIGHT {
            return None;
        }
        let bit_index = (y * WIDTH + x) as usize;
        Some((bit_index / 8, 1 << (7 - bit_index % 8)))
    }
}

impl Default for BinaryImage {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BinaryImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryImage")
            .field("foreground", &self.count_foreground())
            .finish_non_exhaustive()
    }
}

// Serialized as a fixed-arity tuple so no serializer ever emits a length
// prefix for the image payload. The journal is ABI-encoded and does not go
// through serde; this covers images passed through the zkVM's
// `env::write`/`env::commit` codec or stored with bincode.
impl Serialize for BinaryImage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut tuple = serializer.serialize_tuple(IMAGE_BYTES)?;
        for byte in &self.0 {
            tuple.serialize_element(byte)?;
        }
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for BinaryImage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ImageVisitor;

        impl<'de> Visitor<'de> for ImageVisitor {
            type Value = BinaryImage;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a tuple of {IMAGE_BYTES} bytes")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut data = [0u8; IMAGE_BYTES];
                for (i, slot) in data.iter_mut().enumerate() {
                    *slot = seq
                        .next_element()?
                        .ok_or_else(|| de::Error::invalid_length(i, &self))?;
                }
                Ok(BinaryImage(data))
            }
        }

        deserializer.deserialize_tuple(IMAGE_BYTES, ImageVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixels_pack_msb_first() {
        let mut image = BinaryImage::new();
        image.set_pixel(0, 0, true);
        image.set_pixel(9, 0, true);
        image.set_pixel(31, 63, true);

        assert_eq!(image.as_bytes()[0], 0b1000_0000);
        assert_eq!(image.as_bytes()[1], 0b0100_0000);
        assert_eq!(image.as_bytes()[IMAGE_BYTES - 1], 0b0000_0001);
        assert_eq!(image.count_foreground(), 3);

        image.set_pixel(9, 0, false);
        assert!(!image.get_pixel(9, 0));
        assert!(image.get_pixel(31, 63));
    }

    #[test]
    fn out_of_range_pixels_are_ignored() {
        let mut image = BinaryImage::new();
        image.set_pixel(WIDTH, 0, true);
        image.set_pixel(0, HEIGHT, true);
        assert_eq!(image, BinaryImage::new());
        assert!(!image.get_pixel(WIDTH, HEIGHT));
    }

    #[test]
    fn from_bytes_requires_exact_length() {
        assert!(BinaryImage::from_bytes(&[0u8; IMAGE_BYTES]).is_ok());
        assert_eq!(
            BinaryImage::from_bytes(&[0u8; IMAGE_BYTES + 1]).unwrap_err(),
            JournalError::InvalidImageLength {
                expected: IMAGE_BYTES,
                actual: IMAGE_BYTES + 1,
            }
        );
    }

    #[test]
    fn serializes_without_length_prefix() {
        let mut image = BinaryImage::new();
        image.set_pixel(5, 7, true);

        let bytes = bincode::serialize(&image).unwrap();
        assert_eq!(bytes.len(), IMAGE_BYTES);
        assert_eq!(bytes.as_slice(), image.as_bytes());
        assert_eq!(bincode::deserialize::<BinaryImage>(&bytes).unwrap(), image);
        assert!(bincode::deserialize::<BinaryImage>(&bytes[1..]).is_err());
    }
}
