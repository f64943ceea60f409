#![no_main]

use libfuzzer_sys::fuzz_target;
use berdec::decode::SliceSource;
use berdec::{BitString, Mode, OctetString, Tag};

macro_rules! decode_strings {
    ( $data:expr, [ $( $mode:ident ),* ] ) => {{
        $(
            let take = Mode::$mode.decode(SliceSource::new($data), |dec| {
                dec.take::<BitString>()
            });
            let mut octets = Vec::new();
            let string = Mode::$mode.decode(SliceSource::new($data), |dec| {
                dec.decode_string(
                    &mut octets, Tag::BIT_STRING, Tag::BIT_STRING
                ).map(|_| ())
            }).is_ok();
            assert_eq!(take.is_ok(), string);

            if let Ok(take) = take {
                assert!(take.unused() < 8);
                assert!(take.octet_len() > 0 || take.unused() == 0);
                assert_eq!(take.octet_slice(), octets.as_slice());
            }

            let _ = Mode::$mode.decode(SliceSource::new($data), |dec| {
                dec.take::<OctetString>()
            });
            let _ = Mode::$mode.decode(SliceSource::new($data), |dec| {
                dec.take_opt::<OctetString>(Tag::ctx(0))
            });
            let _ = Mode::$mode.decode(SliceSource::new($data), |dec| {
                let mut out = Vec::new();
                dec.decode_optional_string(
                    &mut out, Tag::OCTET_STRING, 0
                )?;
                dec.discard_remaining().map(|_| ())
            });
        )*
    }}

}

fuzz_target!(|data: &[u8]| {
    decode_strings!(data, [Ber, Der]);
});
