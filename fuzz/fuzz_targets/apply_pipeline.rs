//! Fuzz target for apply-mask
//!
//! # Strategy
//!
//! - Genuine tokens from obtain-mask, some corrupted at a chosen byte
//! - Arbitrary strings in place of tokens or data
//! - Both data encodings
//!
//! # Invariants
//!
//! - apply-mask NEVER panics
//! - Untouched genuine tokens with hashed data always succeed
//! - A corrupted token is reported at its own index
//! - Output length equals input length on success

#![no_main]

use std::sync::{
    Arc,
    atomic::{AtomicU8, Ordering},
};

use arbitrary::Arbitrary;
use base64::{Engine, engine::general_purpose::STANDARD};
use libfuzzer_sys::fuzz_target;
use oblimask_core::{
    DataEncoding, EntropyError, Environment, MaskingError, MaskingProtocol, ProtocolConfig,
};
use oblimask_crypto::{DataElement, EncryptedMaskToken, KEY_SIZE, MaskingKey, decode, encode};

/// Fills buffers from a counter so runs are reproducible.
#[derive(Clone)]
struct CounterEnv(Arc<AtomicU8>);

impl Environment for CounterEnv {
    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), EntropyError> {
        let n = self.0.fetch_add(1, Ordering::Relaxed);
        for (i, byte) in buffer.iter_mut().enumerate() {
            *byte = n.wrapping_mul(37).wrapping_add(i as u8) | 1;
        }
        Ok(())
    }
}

#[derive(Debug, Arbitrary)]
enum Slot {
    Genuine { input: Vec<u8> },
    Corrupted { input: Vec<u8>, position: u8, flip: u8 },
    Garbage { token: String, data: String },
}

#[derive(Debug, Arbitrary)]
struct Input {
    seed: u8,
    raw: bool,
    slots: Vec<Slot>,
}

fuzz_target!(|input: Input| {
    if input.slots.is_empty() || input.slots.len() > 32 {
        return;
    }

    let protocol = MaskingProtocol::new(
        MaskingKey::from_bytes([0x33; KEY_SIZE]),
        CounterEnv(Arc::new(AtomicU8::new(input.seed))),
        ProtocolConfig::default(),
    );
    let Ok(issued) = protocol.obtain_masks(input.slots.len()) else {
        return;
    };

    let encoding = if input.raw { DataEncoding::Raw } else { DataEncoding::Element };
    let mut tokens = Vec::new();
    let mut data = Vec::new();
    let mut first_bad = None;

    for (index, (slot, token)) in input.slots.iter().zip(issued).enumerate() {
        match slot {
            Slot::Genuine { input } => {
                tokens.push(token);
                data.push(encode_data(input, encoding));
            },
            Slot::Corrupted { input, position, flip } => {
                let Ok(parsed) = decode::<EncryptedMaskToken>(&token) else {
                    return;
                };
                let mut bytes = *parsed.as_bytes();
                bytes[*position as usize % bytes.len()] ^= flip | 1;
                let Ok(tampered) = EncryptedMaskToken::from_bytes(&bytes) else {
                    return;
                };
                tokens.push(encode(&tampered));
                data.push(encode_data(input, encoding));
                first_bad.get_or_insert(index);
            },
            Slot::Garbage { token, data: item } => {
                tokens.push(token.clone());
                data.push(item.clone());
                first_bad.get_or_insert(index);
            },
        }
    }

    let result = protocol.apply_masks(&tokens, &data, encoding);

    match first_bad {
        None => assert_eq!(result.map(|masked| masked.len()).ok(), Some(tokens.len())),
        Some(index) => {
            if let Err(MaskingError::InvalidToken { index: reported }) = result {
                assert_eq!(reported, index);
            }
        },
    }
});

fn encode_data(input: &[u8], encoding: DataEncoding) -> String {
    match encoding {
        DataEncoding::Element => encode(&DataElement::hash(input)),
        DataEncoding::Raw => STANDARD.encode(input),
    }
}
