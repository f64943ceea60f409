#![no_main]

use libfuzzer_sys::fuzz_target;
use berdec::decode::{DecodeError, Decoder, Source};
use berdec::Mode;

/// Walks over all values, entering every constructed one.
fn walk<S: Source, P>(
    dec: &mut Decoder<S, P>, depth: usize
) -> Result<usize, DecodeError> {
    let mut count = 0;
    while let Some(obj) = dec.get_opt_object()? {
        count += 1;
        if obj.is_constructed() && depth < 32 {
            let mut inner = obj.into_decoder(dec.mode());
            count += walk(&mut inner, depth + 1)?;
            inner.verify_end()?;
        }
    }
    Ok(count)
}

fuzz_target!(|data: &[u8]| {
    for mode in [Mode::Ber, Mode::Der] {
        let _ = walk(&mut mode.decoder(data), 0);

        // Raw bytes are handed out unchanged, even after a push back.
        let mut dec = mode.decoder(data);
        if let Ok(Some(obj)) = dec.get_opt_object() {
            dec.push_back(obj);
        }
        let mut out = Vec::new();
        if dec.raw_bytes(&mut out).is_ok() {
            assert_eq!(out.as_slice(), data);
        }
    }
});
