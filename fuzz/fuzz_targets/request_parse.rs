//! Fuzz target for request body parsing
//!
//! Feeds arbitrary bytes to the shape-dispatching parser.
//!
//! # Invariants
//!
//! - Parsing NEVER panics
//! - Every rejection is `malformed_input`

#![no_main]

use libfuzzer_sys::fuzz_target;
use oblimask_core::{ErrorKind, Request};

fuzz_target!(|data: &[u8]| {
    if let Err(err) = Request::from_json(data) {
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }
});
