//! Dataset filters.
//!
//! A filter transforms the stored bytes of a dataset.
//! Filters are applied in order when a dataset is written and in reverse order when it is read,
//! so a reader never observes whether a dataset was compressed.
//! The available filters mirror the HDF5 filters written by `h5py`: `shuffle` and `gzip` (deflate).

use std::io::{Cursor, Read};

use derive_more::Display;
use flate2::bufread::{GzDecoder, GzEncoder};
use thiserror::Error;

/// A gzip compression level.
///
/// An integer from 0 to 9 which controls the speed and level of compression.
/// A level of 1 is the fastest compression method and produces the least compression, while 9 is slowest and produces the most compression.
/// Compression is turned off completely when level is 0.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Display)]
pub struct GzipCompressionLevel(u32);

/// An invalid compression level.
#[derive(Debug, Error)]
#[error("invalid compression level {0}, must be 0-9")]
pub struct GzipCompressionLevelError(u32);

impl TryFrom<u32> for GzipCompressionLevel {
    type Error = GzipCompressionLevelError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if value < 10 {
            Ok(Self(value))
        } else {
            Err(GzipCompressionLevelError(value))
        }
    }
}

impl GzipCompressionLevel {
    /// Returns the compression level as a `u32`.
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

/// A dataset filter.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Display)]
pub enum DatasetFilter {
    /// gzip (deflate) compression.
    #[display("gzip({_0})")]
    Gzip(GzipCompressionLevel),
    /// Byte shuffling of fixed-size elements.
    #[display("shuffle({element_size})")]
    Shuffle {
        /// The size of an element in bytes.
        element_size: usize,
    },
}

/// A dataset filter error.
#[derive(Debug, Error)]
pub enum FilterError {
    /// An IO error from a compression filter.
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    /// The input length is not a multiple of the shuffle element size.
    #[error("shuffle filter input of {len} bytes is not a multiple of the element size {element_size}")]
    ShuffleLength {
        /// The input length.
        len: usize,
        /// The element size.
        element_size: usize,
    },
}

fn is_multiple_of(lhs: usize, rhs: usize) -> bool {
    match rhs {
        0 => lhs == 0,
        _ => lhs % rhs == 0,
    }
}

impl DatasetFilter {
    /// Create a gzip filter.
    ///
    /// # Errors
    /// Returns [`GzipCompressionLevelError`] if `compression_level` is not valid.
    pub fn gzip(compression_level: u32) -> Result<Self, GzipCompressionLevelError> {
        Ok(Self::Gzip(compression_level.try_into()?))
    }

    /// Encode `decoded` bytes.
    ///
    /// # Errors
    /// Returns a [`FilterError`] if the input is invalid for this filter or compression fails.
    pub fn encode(&self, decoded: Vec<u8>) -> Result<Vec<u8>, FilterError> {
        match self {
            Self::Gzip(level) => {
                let mut encoder = GzEncoder::new(
                    Cursor::new(decoded),
                    flate2::Compression::new(level.as_u32()),
                );
                let mut out: Vec<u8> = Vec::new();
                encoder.read_to_end(&mut out)?;
                Ok(out)
            }
            Self::Shuffle { element_size } => {
                let element_size = *element_size;
                check_shuffle_length(decoded.len(), element_size)?;
                let mut encoded = decoded.clone();
                let count = decoded.len().checked_div(element_size).unwrap_or_default();
                for i in 0..count {
                    let offset = i * element_size;
                    for byte_index in 0..element_size {
                        encoded[byte_index * count + i] = decoded[offset + byte_index];
                    }
                }
                Ok(encoded)
            }
        }
    }

    /// Decode `encoded` bytes.
    ///
    /// # Errors
    /// Returns a [`FilterError`] if the input is corrupt or invalid for this filter.
    pub fn decode(&self, encoded: Vec<u8>) -> Result<Vec<u8>, FilterError> {
        match self {
            Self::Gzip(_) => {
                let mut decoder = GzDecoder::new(Cursor::new(encoded));
                let mut out: Vec<u8> = Vec::new();
                decoder.read_to_end(&mut out)?;
                Ok(out)
            }
            Self::Shuffle { element_size } => {
                let element_size = *element_size;
                check_shuffle_length(encoded.len(), element_size)?;
                let mut decoded = encoded.clone();
                let count = encoded.len().checked_div(element_size).unwrap_or_default();
                for i in 0..element_size {
                    let offset = i * count;
                    for byte_index in 0..count {
                        decoded[byte_index * element_size + i] = encoded[offset + byte_index];
                    }
                }
                Ok(decoded)
            }
        }
    }
}

fn check_shuffle_length(len: usize, element_size: usize) -> Result<(), FilterError> {
    if is_multiple_of(len, element_size) {
        Ok(())
    } else {
        Err(FilterError::ShuffleLength { len, element_size })
    }
}

/// Encode `bytes` through `filters` in order.
///
/// # Errors
/// Returns a [`FilterError`] if any filter fails.
pub fn encode_filters(filters: &[DatasetFilter], bytes: Vec<u8>) -> Result<Vec<u8>, FilterError> {
    filters
        .iter()
        .try_fold(bytes, |bytes, filter| filter.encode(bytes))
}

/// Decode `bytes` through `filters` in reverse order.
///
/// # Errors
/// Returns a [`FilterError`] if any filter fails.
pub fn decode_filters(filters: &[DatasetFilter], bytes: Vec<u8>) -> Result<Vec<u8>, FilterError> {
    filters
        .iter()
        .rev()
        .try_fold(bytes, |bytes, filter| filter.decode(bytes))
}
