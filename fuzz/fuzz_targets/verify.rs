#![no_main]
// Verification must reject malformed keys, signatures and identities
// without panicking.
use libfuzzer_sys::fuzz_target;
use shangmi_sm2::{
    BigUint, CurveParams,
    dsa::{self, Signature, VerifyingKey, signature::Verifier},
};

fuzz_target!(|data: &[u8]| {
    if data.len() < 130 {
        return;
    }

    let (key, rest) = data.split_at(65);
    let (sig, rest) = rest.split_at(64);
    let (id_len, msg) = rest.split_at(1);
    let id_len = usize::from(id_len[0]).min(msg.len());
    let (identity, msg) = msg.split_at(id_len);

    for curve in [CurveParams::sm2(), CurveParams::sm2_example()] {
        let Ok(signature) = Signature::from_slice(sig) else {
            continue;
        };

        if let Ok(vk) = VerifyingKey::from_sec1_bytes(curve, identity, key) {
            let _ = vk.verify(msg, &signature);
        }

        // free function; the identity is among the possible keys
        if let Ok(point) = curve.mul_generator(&BigUint::from_bytes_be(&key[1..33])) {
            let _ = dsa::verify(curve, &point, identity, msg, &signature);
        }
    }
});
