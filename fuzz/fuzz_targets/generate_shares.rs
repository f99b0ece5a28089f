#![no_main]
use libfuzzer_sys::fuzz_target;

use arbitrary::Arbitrary;
use evoshare::SecretSharing;
use num_bigint::BigUint;

#[derive(Debug, Arbitrary)]
struct Parameters {
    pub threshold: u8,
    pub secret: Vec<u8>,
    pub n_shares: u8,
}

fuzz_target!(|params: Parameters| {
    let Ok(sss) = SecretSharing::<127>::new(params.threshold as usize) else {
        return;
    };
    let secret = BigUint::from_bytes_be(&params.secret);
    if let Ok(shares) = sss.split(&secret, params.n_shares as u64) {
        let recovered = sss.recover(&shares[..sss.threshold()]).unwrap();
        assert_eq!(recovered, secret);
    }
});
