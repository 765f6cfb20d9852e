use crate::bitbuffer::BitReader;
use crate::error::Error;
use crate::window::{BitWindow, LEADING_ZEROS_BITS, SIGNIFICANT_BITS_BITS};
use crate::SENTINEL;

/// The float decompressor.
///
/// A cursor over an encoded stream: [`advance`](Decoder::advance) steps to
/// the next value and [`value`](Decoder::value) reads it. Decoding ends at the
/// end-of-stream marker or at the first read error, which is kept and
/// returned by [`error`](Decoder::error). To decode again, call
/// [`set_bytes`](Decoder::set_bytes) with the original bytes.
///
/// # Example
/// ```
/// use gorilla_float::{Decoder, Encoder};
///
/// let bytes = Encoder::encode(&[12.0, 12.5, 13.0]).unwrap();
///
/// let mut decoder = Decoder::from_bytes(&bytes).unwrap();
/// let mut values = Vec::new();
/// while decoder.advance() {
///     values.push(decoder.value());
/// }
/// assert!(decoder.error().is_none());
/// assert_eq!(values, vec![12.0, 12.5, 13.0]);
/// ```
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    reader: BitReader<'a>,
    /// Header byte of the attached stream, if any.
    header: Option<u8>,
    /// Current value as raw bits.
    value_bits: u64,
    window: BitWindow,
    first: bool,
    finished: bool,
    err: Option<Error>,
}

impl<'a> Decoder<'a> {
    /// Creates a decoder over an empty stream.
    pub fn new() -> Self {
        Self {
            reader: BitReader::new(&[]),
            header: None,
            value_bits: SENTINEL,
            window: BitWindow::default(),
            first: true,
            finished: false,
            err: None,
        }
    }

    /// Creates a decoder positioned before the first value of `bytes`.
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self, Error> {
        let mut decoder = Self::new();
        decoder.set_bytes(bytes)?;
        Ok(decoder)
    }

    /// Decodes every value in `bytes`.
    pub fn decode(bytes: &[u8]) -> Result<Vec<f64>, Error> {
        let mut decoder = Decoder::from_bytes(bytes)?;
        let values: Vec<f64> = decoder.by_ref().collect();
        match decoder.err {
            Some(err) => Err(err),
            None => Ok(values),
        }
    }

    /// Starts decoding `bytes`, discarding any previous state.
    ///
    /// An empty slice is a stream with no values. Otherwise the first byte is
    /// the header and the next 64 bits are the first value; if those are
    /// missing the decoder is left terminated with the returned error.
    pub fn set_bytes(&mut self, bytes: &'a [u8]) -> Result<(), Error> {
        self.window = BitWindow::default();
        self.first = true;
        self.finished = false;
        self.err = None;

        let Some((&header, stream)) = bytes.split_first() else {
            self.reader = BitReader::new(&[]);
            self.header = None;
            self.value_bits = SENTINEL;
            return Ok(());
        };

        self.reader = BitReader::new(stream);
        self.header = Some(header);
        match self.reader.read_bits(64) {
            Ok(seed) => {
                self.value_bits = seed;
                log::debug!(
                    "attached float stream: header={:#04x}, {} bytes",
                    header,
                    bytes.len()
                );
                Ok(())
            }
            Err(err) => {
                log::debug!("float stream too short for seed value: {err}");
                self.value_bits = SENTINEL;
                self.err = Some(err);
                Err(err)
            }
        }
    }

    /// Steps to the next value. Returns `false` at the end of the stream or
    /// on error, and keeps returning `false` afterwards.
    pub fn advance(&mut self) -> bool {
        if self.err.is_some() || self.finished {
            return false;
        }

        if self.first {
            self.first = false;
            if self.value_bits == SENTINEL {
                self.finished = true;
                return false;
            }
            return true;
        }

        match self.read_next() {
            Ok(Some(bits)) => {
                self.value_bits = bits;
                true
            }
            Ok(None) => {
                self.finished = true;
                false
            }
            Err(err) => {
                log::debug!("float decode stopped: {err}");
                self.err = Some(err);
                false
            }
        }
    }

    /// The current value. Only meaningful after [`advance`](Self::advance)
    /// has returned `true`.
    #[inline]
    pub fn value(&self) -> f64 {
        f64::from_bits(self.value_bits)
    }

    /// The error that stopped decoding, if any.
    pub fn error(&self) -> Option<&Error> {
        self.err.as_ref()
    }

    /// Compression scheme identifier from the header's high nibble, or
    /// `None` for an empty stream.
    pub fn compression_type(&self) -> Option<u8> {
        self.header.map(|h| h >> 4)
    }

    // ── internal helpers ───────────────────────────────────────────────

    /// Reads one record. `Ok(None)` is the end-of-stream marker.
    fn read_next(&mut self) -> Result<Option<u64>, Error> {
        if !self.read_control_bit()? {
            return Ok(Some(self.value_bits));
        }

        if self.read_control_bit()? {
            let leading = self.reader.read_bits(LEADING_ZEROS_BITS)? as u8;
            let mut significant = self.reader.read_bits(SIGNIFICANT_BITS_BITS)? as u8;
            // Zero stands in for 64; see the encoder.
            if significant == 0 {
                significant = 64;
            }
            if leading + significant > 64 {
                return Err(Error::InvalidWindow {
                    leading,
                    significant,
                });
            }
            self.window = BitWindow {
                leading,
                trailing: 64 - leading - significant,
            };
        }

        let meaningful = self.reader.read_bits(self.window.significant_bits())?;
        let bits = self.value_bits ^ (meaningful << self.window.trailing);
        if bits == SENTINEL {
            return Ok(None);
        }
        Ok(Some(bits))
    }

    #[inline]
    fn read_control_bit(&mut self) -> Result<bool, Error> {
        if self.reader.can_read_bit_fast() {
            Ok(self.reader.read_bit_fast())
        } else {
            self.reader.read_bit()
        }
    }
}

impl Default for Decoder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Yields decoded values until the end-of-stream marker or an error. Check
/// [`Decoder::error`] afterwards to tell the two apart.
impl Iterator for Decoder<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.advance() {
            Some(self.value())
        } else {
            None
        }
    }
}
