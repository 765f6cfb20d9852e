use crate::bitbuffer::BitBuffer;
use crate::error::Error;
use crate::window::{BitWindow, LEADING_ZEROS_BITS, SIGNIFICANT_BITS_BITS};
use crate::{HEADER, SENTINEL};

/// The float compressor.
///
/// Values are compressed by XOR-ing each one's bit pattern with its
/// predecessor's and writing only the bits that changed:
///
/// | XOR result                           | record                                   |
/// |--------------------------------------|------------------------------------------|
/// | zero                                 | `0`                                      |
/// | fits inside the previous window      | `10` + window bits                       |
/// | otherwise                            | `11` + 5-bit leading + 6-bit length + bits |
///
/// Writing a NaN before [`flush`](Encoder::flush) does not fail the call: the
/// value is skipped, [`Error::UnsupportedValue`] is kept, and later writes
/// carry on appending. The error comes back from [`bytes`](Encoder::bytes).
///
/// # Example
/// ```
/// use gorilla_float::{Decoder, Encoder};
///
/// let mut encoder = Encoder::new();
/// encoder.write(12.0);
/// encoder.write(12.5);
/// encoder.write(12.5);
/// encoder.flush();
///
/// let bytes = encoder.bytes().unwrap();
/// assert_eq!(Decoder::decode(bytes).unwrap(), vec![12.0, 12.5, 12.5]);
/// ```
#[derive(Debug, Clone)]
pub struct Encoder {
    buf: BitBuffer,
    /// Previous value as raw bits.
    prev_value_bits: u64,
    /// Window of the last new-window record, `None` until one is written.
    window: Option<BitWindow>,
    /// Number of values appended so far.
    count: u64,
    first: bool,
    finished: bool,
    err: Option<Error>,
}

impl Encoder {
    /// Creates a new `Encoder` with a default buffer.
    pub fn new() -> Self {
        Self::with_capacity(128)
    }

    /// Creates a new `Encoder` whose buffer pre-allocates `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buf = BitBuffer::with_capacity(capacity.max(1));
        buf.resume(HEADER, 8);
        Self {
            buf,
            prev_value_bits: 0,
            window: None,
            count: 0,
            first: true,
            finished: false,
            err: None,
        }
    }

    /// Compresses `values` into a finished, self-delimiting buffer.
    pub fn encode(values: &[f64]) -> Result<Vec<u8>, Error> {
        let mut enc = Self::with_capacity(values.len() + 16);
        for &v in values {
            enc.write(v);
        }
        enc.flush();
        enc.into_bytes()
    }

    /// Appends a value to the stream.
    ///
    /// A NaN written before [`flush`](Self::flush) is skipped and recorded as
    /// [`Error::UnsupportedValue`]. Subsequent writes are still appended.
    pub fn write(&mut self, v: f64) {
        if v.is_nan() && !self.finished {
            if self.err.is_none() {
                log::warn!(
                    "rejected NaN after {} values; NaN is reserved as end-of-stream marker",
                    self.count
                );
            }
            self.err = Some(Error::UnsupportedValue);
            return;
        }
        self.append(v.to_bits());
        self.count += 1;
    }

    /// Terminates the stream with the end-of-stream marker and pads it to a
    /// byte boundary. Calling it again does nothing.
    pub fn flush(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.append(SENTINEL);
        self.buf.flush(false);
        log::debug!(
            "flushed float stream: {} values in {} bytes",
            self.count,
            self.buf.as_bytes().len()
        );
    }

    /// Returns the encoded bytes, header included, or the first error
    /// recorded by [`write`](Self::write).
    ///
    /// Before [`flush`](Self::flush) the bytes hold no end-of-stream marker,
    /// so a reader has to know the value count to stop in the right place.
    pub fn bytes(&self) -> Result<&[u8], Error> {
        match self.err {
            Some(err) => Err(err),
            None => Ok(self.buf.as_bytes()),
        }
    }

    /// Consumes the encoder and returns the encoded bytes, or the first error
    /// recorded by [`write`](Self::write).
    pub fn into_bytes(self) -> Result<Vec<u8>, Error> {
        match self.err {
            Some(err) => Err(err),
            None => Ok(self.buf.into_bytes()),
        }
    }

    /// Returns the underlying `BitBuffer`, whether or not an error was
    /// recorded.
    pub fn buffer(&self) -> &BitBuffer {
        &self.buf
    }

    /// Total number of bits written, header included.
    pub fn len_bits(&self) -> usize {
        self.buf.len_bits()
    }

    /// Returns the number of values appended so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns `true` once [`flush`](Self::flush) has run.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Returns the encoder to its freshly-constructed state, keeping the
    /// buffer's allocation.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.buf.resume(HEADER, 8);
        self.prev_value_bits = 0;
        self.window = None;
        self.count = 0;
        self.first = true;
        self.finished = false;
        self.err = None;
    }

    // ── internal helpers ───────────────────────────────────────────────

    fn append(&mut self, bits: u64) {
        if self.first {
            self.first = false;
            self.buf.write_bits(bits, 64);
            self.prev_value_bits = bits;
            return;
        }

        let delta = bits ^ self.prev_value_bits;
        if delta == 0 {
            self.buf.write_bit(false);
        } else {
            self.buf.write_bit(true);
            self.append_delta(delta);
        }
        self.prev_value_bits = bits;
    }

    fn append_delta(&mut self, delta: u64) {
        let current = BitWindow::of(delta);

        match self.window {
            Some(window) if window.contains(&current) => {
                self.buf.write_bit(false);
                self.buf
                    .write_bits(delta >> window.trailing, window.significant_bits());
            }
            _ => {
                self.buf.write_bit(true);
                let significant = current.significant_bits();
                log::trace!(
                    "new window: leading={} trailing={} significant={}",
                    current.leading,
                    current.trailing,
                    significant
                );
                self.buf
                    .write_bits(current.leading as u64, LEADING_ZEROS_BITS);
                // 64 does not fit in six bits; zero is never a valid length
                // here since the delta is non-zero, so it stands in for 64.
                self.buf
                    .write_bits((significant & 0x3F) as u64, SIGNIFICANT_BITS_BITS);
                self.buf.write_bits(delta >> current.trailing, significant);
                self.window = Some(current);
            }
        }
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}
