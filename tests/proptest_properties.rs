use gorilla_float::{Decoder, Encoder, Error};
use proptest::prelude::*;

/// Any non-NaN double, including infinities, subnormals and signed zeros.
fn arb_value() -> impl Strategy<Value = f64> {
    any::<u64>()
        .prop_map(f64::from_bits)
        .prop_filter("NaN is reserved", |v| !v.is_nan())
}

prop_compose! {
    /// A metric-like series: a start value plus small random steps, with
    /// runs of repeats.
    fn arb_series()(
        start in -1.0e6f64..1.0e6,
        steps in prop::collection::vec((0u8..4, -10.0f64..10.0), 0..300),
    ) -> Vec<f64> {
        let mut v = start;
        let mut out = vec![start];
        for (kind, step) in steps {
            if kind != 0 {
                v += step;
            }
            out.push(v);
        }
        out
    }
}

fn to_bits(values: &[f64]) -> Vec<u64> {
    values.iter().map(|v| v.to_bits()).collect()
}

proptest! {
    #[test]
    fn prop_roundtrip_arbitrary_bits(values in prop::collection::vec(arb_value(), 0..200)) {
        let bytes = Encoder::encode(&values).unwrap();
        let decoded = Decoder::decode(&bytes).unwrap();
        prop_assert_eq!(to_bits(&decoded), to_bits(&values));
    }

    #[test]
    fn prop_roundtrip_series(values in arb_series()) {
        let bytes = Encoder::encode(&values).unwrap();
        let decoded = Decoder::decode(&bytes).unwrap();
        prop_assert_eq!(to_bits(&decoded), to_bits(&values));
    }

    #[test]
    fn prop_flushed_stream_is_byte_aligned(values in arb_series()) {
        let mut enc = Encoder::new();
        for &v in &values {
            enc.write(v);
        }
        enc.flush();
        prop_assert_eq!(enc.len_bits() % 8, 0);
        prop_assert_eq!(enc.count(), values.len() as u64);
    }

    #[test]
    fn prop_nan_is_skipped_and_reported(
        values in prop::collection::vec(arb_value(), 1..100),
        at in any::<prop::sample::Index>(),
    ) {
        let nan_at = at.index(values.len() + 1);
        let mut enc = Encoder::new();
        for (i, &v) in values.iter().enumerate() {
            if i == nan_at {
                enc.write(f64::NAN);
            }
            enc.write(v);
        }
        if nan_at == values.len() {
            enc.write(f64::NAN);
        }
        enc.flush();

        prop_assert_eq!(enc.bytes(), Err(Error::UnsupportedValue));
        let decoded = Decoder::decode(enc.buffer().as_bytes()).unwrap();
        prop_assert_eq!(to_bits(&decoded), to_bits(&values));
    }

    #[test]
    fn prop_truncation_never_panics(
        values in prop::collection::vec(arb_value(), 1..50),
        cut in any::<prop::sample::Index>(),
    ) {
        let bytes = Encoder::encode(&values).unwrap();
        let cut = cut.index(bytes.len());
        let truncated = &bytes[..cut];

        match Decoder::from_bytes(truncated) {
            Ok(mut dec) => {
                let mut decoded = Vec::new();
                while dec.advance() {
                    decoded.push(dec.value());
                }
                // Records are only accepted once read in full, so whatever
                // came out before the cut is a prefix of the input.
                prop_assert!(decoded.len() <= values.len());
                prop_assert_eq!(to_bits(&decoded), to_bits(&values[..decoded.len()]));
            }
            Err(err) => {
                let is_truncated = matches!(err, Error::TruncatedStream { .. });
                prop_assert!(is_truncated);
            }
        }
    }

    #[test]
    fn prop_garbage_input_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        if let Ok(dec) = Decoder::from_bytes(&bytes) {
            // Every record consumes at least one bit, so this terminates.
            let n = dec.count();
            prop_assert!(n <= bytes.len() * 8);
        }
    }
}
