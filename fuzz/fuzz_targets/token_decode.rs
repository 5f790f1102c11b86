//! Fuzz target for token and element decoding
//!
//! # Strategy
//!
//! - Raw bytes: parsed directly as a token, element, and masked element
//! - Text: the same bytes as (lossy) UTF-8 through the base64 decoders
//! - Opening: any token that parses is opened under a fixed key
//!
//! # Invariants
//!
//! - Decoding NEVER panics
//! - Only inputs of exactly the right length parse as tokens
//! - Arbitrary tokens never authenticate under the fixed key

#![no_main]

use libfuzzer_sys::fuzz_target;
use oblimask_crypto::{
    DataElement, EncryptedMaskToken, KEY_SIZE, MaskedElement, MaskingKey, TOKEN_SIZE, decode,
    open_mask,
};

fuzz_target!(|data: &[u8]| {
    let _ = DataElement::from_bytes(data);
    let _ = MaskedElement::from_bytes(data);

    let text = String::from_utf8_lossy(data);
    let _ = decode::<DataElement>(&text);
    let _ = decode::<EncryptedMaskToken>(&text);

    match EncryptedMaskToken::from_bytes(data) {
        Ok(token) => {
            assert_eq!(data.len(), TOKEN_SIZE);
            let key = MaskingKey::from_bytes([0x5A; KEY_SIZE]);
            assert!(open_mask(&key, &token).is_err(), "forged token authenticated");
        },
        Err(_) => assert_ne!(data.len(), TOKEN_SIZE),
    }
});
