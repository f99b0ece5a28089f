#![no_main]
use libfuzzer_sys::fuzz_target;

use arbitrary::Arbitrary;
use evoshare::{SecretSharing, Share};

#[derive(Debug, Arbitrary)]
struct Parameters {
    pub threshold: u8,
    pub shares: Vec<Share>,
}

fuzz_target!(|params: Parameters| {
    if let Ok(sss) = SecretSharing::<127>::new(params.threshold as usize) {
        let _secret = sss.recover(&params.shares);
    }
});
