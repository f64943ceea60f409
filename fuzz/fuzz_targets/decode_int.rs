#![no_main]

use libfuzzer_sys::fuzz_target;
use berdec::{Integer, Mode, Tag, Unsigned};
use berdec::decode::SliceSource;

macro_rules! decode_builtin {
    ( $data:expr, $type:ty ) => {{
        let _ = Mode::Ber.decode(SliceSource::new($data), |dec| {
            dec.take::<$type>()
        });
    }}
}

fuzz_target!(|data: &[u8]| {
    let int = Mode::Ber.decode(SliceSource::new(data), |dec| {
        dec.take::<Integer>()
    });
    let uint = Mode::Ber.decode(SliceSource::new(data), |dec| {
        dec.take::<Unsigned>()
    });
    if let Ok(int) = int {
        assert_eq!(!int.is_negative(), uint.is_ok());
    }

    decode_builtin!(data, i8);
    decode_builtin!(data, u8);
    decode_builtin!(data, i16);
    decode_builtin!(data, u16);
    decode_builtin!(data, i32);
    decode_builtin!(data, u32);
    decode_builtin!(data, i64);
    decode_builtin!(data, u64);

    for width in 1..=8 {
        let _ = Mode::Der.decode(SliceSource::new(data), |dec| {
            dec.decode_constrained_integer(Tag::INTEGER, width)
        });
    }
});
