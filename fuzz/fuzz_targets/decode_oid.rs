#![no_main]

use libfuzzer_sys::fuzz_target;
use berdec::decode::SliceSource;
use berdec::{ConstOid, Mode, Oid, Tag};

pub const SHA256: ConstOid = Oid(&[96, 134, 72, 1, 101, 3, 4, 2, 1]);

fuzz_target!(|data: &[u8]| {
    let take = Mode::Ber.decode(SliceSource::new(data), |dec| {
        dec.take::<Oid>()
    });
    let opt = Mode::Ber.decode(SliceSource::new(data), |dec| {
        dec.take_opt::<Oid>(Tag::OID)
    });
    if let Ok(take) = take.as_ref() {
        let _ = take.to_string();
        let _ = take.arcs();
        assert_eq!(opt.ok().flatten().as_ref(), Some(take));
        if take.as_ref() == SHA256.as_ref() {
            assert_eq!(take.to_string(), "2.16.840.1.101.3.4.2.1");
        }
    }
});
