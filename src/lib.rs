//! # gorilla-float
//!
//! Lossless, self-delimiting compression for columns of `f64` values, in the
//! style of the value encoding from Facebook's Gorilla paper (VLDB 2015).
//!
//! ## Algorithm overview
//!
//! Consecutive readings of the same metric tend to share most of their bit
//! pattern. Each value is XOR-ed with its predecessor and only the span
//! between the leading and trailing zeros of the result is written. When the
//! span fits inside the previous one, its bounds are not repeated.
//!
//! ## Wire format
//!
//! - byte 0: header, compression type [`FLOAT_COMPRESSED_GORILLA`] in the
//!   high nibble, low nibble reserved
//! - 64 bits: first value, verbatim
//! - one record per following value
//! - a record for [`SENTINEL`], marking the end of the stream
//! - zero bits up to the next byte boundary
//!
//! NaN is reserved for the end-of-stream marker and cannot be encoded.
//!
//! ## Example
//!
//! ```rust
//! use gorilla_float::{Decoder, Encoder};
//!
//! let mut encoder = Encoder::new();
//! for v in [21.5, 21.5, 21.75, 22.0] {
//!     encoder.write(v);
//! }
//! encoder.flush();
//!
//! let bytes = encoder.bytes().unwrap();
//! println!("Compressed 4 values into {} bytes", bytes.len());
//!
//! let values: Vec<f64> = Decoder::from_bytes(bytes).unwrap().collect();
//! assert_eq!(values, vec![21.5, 21.5, 21.75, 22.0]);
//! ```

pub mod bitbuffer;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod window;

// Re-export primary types at the crate root.
pub use bitbuffer::{BitBuffer, BitReader};
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::Error;
pub use window::BitWindow;

/// Compression type of this codec in the header's high nibble.
pub const FLOAT_COMPRESSED_GORILLA: u8 = 1;

/// Header byte written at the start of every encoded stream.
pub const HEADER: u8 = FLOAT_COMPRESSED_GORILLA << 4;

/// Bit pattern of the end-of-stream marker, a quiet NaN.
///
/// Compared by exact bit equality; other NaN patterns are never treated as
/// the marker.
pub const SENTINEL: u64 = 0x7FF8_0000_0000_0001;
