#![no_main]
use core::convert::TryFrom;
use evoshare::Share;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(share) = Share::try_from(data) {
        let bytes: Vec<u8> = (&share).into();
        assert_eq!(Share::try_from(bytes.as_slice()).unwrap(), share);
    }
});
