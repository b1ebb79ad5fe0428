//! Fuzz target for `ServerPush::parse`
//!
//! This fuzzer tests push-record deserialization with:
//! - Malformed JSON
//! - Type confusion (wrong JSON type for a field)
//! - Out-of-range run states
//! - Deeply nested or oversized documents
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use stagelink_proto::ServerPush;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        // This should never panic, only return Err for invalid payloads
        let _ = ServerPush::parse(text);
    }
});
