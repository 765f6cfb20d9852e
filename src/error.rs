/// Errors produced while encoding or decoding a float stream.
///
/// Both the encoder and the decoder keep the first error they hit and report
/// it later instead of failing the call that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A NaN was written before the stream was flushed. NaN is reserved for
    /// the end-of-stream marker.
    #[error("unsupported value: NaN")]
    UnsupportedValue,
    /// A bit read ran past the end of the input.
    #[error("truncated stream: needed {needed} bits, {available} available")]
    TruncatedStream { needed: u8, available: usize },
    /// A new-window record declared more than 64 bits of leading zeros plus
    /// significant bits.
    #[error("invalid window: {leading} leading zeros with {significant} significant bits")]
    InvalidWindow { leading: u8, significant: u8 },
}
