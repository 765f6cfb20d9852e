use crate::error::Error;

/// A growable, MSB-first bit buffer. Used as the output stream of the float
/// encoder.
///
/// The last byte of the buffer may be partially filled; its unused low-order
/// bits are always zero until written.
#[derive(Debug, Clone)]
pub struct BitBuffer {
    bytes: Vec<u8>,
    /// Number of valid bits in the last byte (1..=8, or 0 if empty).
    bit_count: u8,
}

impl BitBuffer {
    /// Creates a new empty `BitBuffer`.
    pub fn new() -> Self {
        Self {
            bytes: Vec::new(),
            bit_count: 0,
        }
    }

    /// Creates a `BitBuffer` with the given pre-allocated capacity in bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
            bit_count: 0,
        }
    }

    /// Returns the total number of bits written.
    #[inline]
    pub fn len_bits(&self) -> usize {
        if self.bytes.is_empty() {
            0
        } else {
            (self.bytes.len() - 1) * 8 + self.bit_count as usize
        }
    }

    /// Returns `true` if no bits have been written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns `true` if the next bit starts a new byte.
    #[inline]
    pub fn is_aligned(&self) -> bool {
        self.bit_count == 0 || self.bit_count == 8
    }

    /// Returns a reference to the underlying byte slice, including a
    /// partially filled last byte.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the buffer and returns the raw byte vector.
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Drops all written bits, keeping the allocation.
    pub fn clear(&mut self) {
        self.bytes.clear();
        self.bit_count = 0;
    }

    /// Continues writing after `byte`, of which the top `bits_used` bits are
    /// already taken. `bits_used == 8` appends a whole byte.
    pub fn resume(&mut self, byte: u8, bits_used: u8) {
        debug_assert!((1..=8).contains(&bits_used));
        debug_assert!(self.is_aligned());
        let mask = if bits_used >= 8 {
            0xFF
        } else {
            !(0xFFu8 >> bits_used)
        };
        self.bytes.push(byte & mask);
        self.bit_count = bits_used.min(8);
    }

    /// Writes a single bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        if self.is_aligned() {
            self.bytes.push(0);
            self.bit_count = 0;
        }
        if bit {
            if let Some(last) = self.bytes.last_mut() {
                *last |= 1 << (7 - self.bit_count);
            }
        }
        self.bit_count += 1;
    }

    /// Writes the lowest `n` bits of `value`, most significant first.
    /// `n` must be <= 64.
    pub fn write_bits(&mut self, value: u64, n: u8) {
        debug_assert!(n <= 64);
        let mut left = n as u32;
        while left > 0 {
            if self.is_aligned() {
                self.bytes.push(0);
                self.bit_count = 0;
            }
            let free = 8 - self.bit_count as u32;
            let take = free.min(left);
            let chunk = ((value >> (left - take)) & ((1u64 << take) - 1)) as u8;
            if let Some(last) = self.bytes.last_mut() {
                *last |= chunk << (free - take);
            }
            self.bit_count += take as u8;
            left -= take;
        }
    }

    /// Pads the last byte up to a byte boundary with `pad` bits.
    pub fn flush(&mut self, pad: bool) {
        if self.is_aligned() {
            return;
        }
        if pad {
            if let Some(last) = self.bytes.last_mut() {
                *last |= 0xFF >> self.bit_count;
            }
        }
        self.bit_count = 8;
    }
}

impl Default for BitBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// A cursor for reading bits sequentially, MSB first, from a byte slice.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    bytes: &'a [u8],
    /// Current bit position (0-indexed from the start).
    pos: usize,
}

impl<'a> BitReader<'a> {
    /// Creates a new `BitReader` over every bit of `bytes`.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Creates a `BitReader` over the bits written to `buffer`.
    pub fn from_buffer(buffer: &'a BitBuffer) -> Self {
        Self::new(buffer.as_bytes())
    }

    /// Returns the number of bits remaining.
    #[inline]
    pub fn remaining(&self) -> usize {
        (self.bytes.len() * 8).saturating_sub(self.pos)
    }

    /// Returns `true` if there are no more bits to read.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns `true` if [`read_bit_fast`](Self::read_bit_fast) may be called.
    #[inline]
    pub fn can_read_bit_fast(&self) -> bool {
        self.pos < self.bytes.len() * 8
    }

    /// Reads a single bit without reporting exhaustion. The caller must have
    /// checked [`can_read_bit_fast`](Self::can_read_bit_fast).
    #[inline]
    pub fn read_bit_fast(&mut self) -> bool {
        debug_assert!(self.can_read_bit_fast());
        let bit = (self.bytes[self.pos / 8] >> (7 - self.pos % 8)) & 1 == 1;
        self.pos += 1;
        bit
    }

    /// Reads a single bit.
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool, Error> {
        if !self.can_read_bit_fast() {
            return Err(Error::TruncatedStream {
                needed: 1,
                available: 0,
            });
        }
        Ok(self.read_bit_fast())
    }

    /// Reads `n` bits as a `u64`, most significant first. `n` must be <= 64.
    ///
    /// Nothing is consumed if fewer than `n` bits remain.
    pub fn read_bits(&mut self, n: u8) -> Result<u64, Error> {
        debug_assert!(n <= 64);
        let available = self.remaining();
        if available < n as usize {
            return Err(Error::TruncatedStream {
                needed: n,
                available,
            });
        }
        let mut value: u64 = 0;
        let mut left = n as u32;
        while left > 0 {
            let byte = self.bytes[self.pos / 8];
            let offset = (self.pos % 8) as u32;
            let take = (8 - offset).min(left);
            let chunk = (byte >> (8 - offset - take)) as u64 & ((1u64 << take) - 1);
            value = (value << take) | chunk;
            self.pos += take as usize;
            left -= take;
        }
        Ok(value)
    }
}
